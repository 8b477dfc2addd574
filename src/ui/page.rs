//! Page graph and route planning
//!
//! Game screens form a directed graph: each [`Page`] carries the anchor
//! that proves it is on screen, each [`Transition`] the button that
//! leaves it. Routing is breadth-first, so the planned path always has
//! the fewest taps; ties fall to whichever edge was registered first.

use std::collections::VecDeque;

use crate::ui::NavigateError;
use crate::vision::Locator;

/// Handle to a page registered in a [`PageGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(pub(crate) usize);

/// One game screen
#[derive(Debug, Clone, Copy)]
pub struct Page {
    /// Screen name for logs and errors
    pub name: &'static str,
    /// Anchor that is visible exactly when this screen is up
    pub check: Locator,
}

impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Page {}

impl std::hash::Hash for Page {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Directed edge between two pages
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    /// Page the edge leaves
    pub from: PageId,
    /// Page the edge lands on
    pub to: PageId,
    /// Button that drives the transition
    pub trigger: Locator,
}

/// The known screens and how they connect
#[derive(Debug, Default)]
pub struct PageGraph {
    pages: Vec<Page>,
    edges: Vec<Vec<Transition>>,
}

impl PageGraph {
    /// Empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page, returning its handle
    ///
    /// Registering the same name twice returns the existing handle, so
    /// graph definitions can stay declarative.
    pub fn page(&mut self, name: &'static str, check: Locator) -> PageId {
        if let Some(i) = self.pages.iter().position(|p| p.name == name) {
            return PageId(i);
        }
        self.pages.push(Page { name, check });
        self.edges.push(Vec::new());
        PageId(self.pages.len() - 1)
    }

    /// Register a directed edge from `from` to `to` driven by `trigger`
    pub fn link(&mut self, from: PageId, to: PageId, trigger: Locator) {
        self.edges[from.0].push(Transition { from, to, trigger });
    }

    /// Look up a registered page
    pub fn get(&self, id: PageId) -> &Page {
        &self.pages[id.0]
    }

    /// All registered pages in registration order
    pub fn pages(&self) -> impl Iterator<Item = (PageId, &Page)> {
        self.pages.iter().enumerate().map(|(i, p)| (PageId(i), p))
    }

    /// Number of registered pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the graph has no pages
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Shortest tap sequence from `from` to `to`
    ///
    /// An already-satisfied route is the empty sequence. Unreachable
    /// targets are [`NavigateError::NoRoute`].
    pub fn route(&self, from: PageId, to: PageId) -> Result<Vec<Transition>, NavigateError> {
        if from == to {
            return Ok(Vec::new());
        }

        let mut seen = vec![false; self.pages.len()];
        let mut prev: Vec<Option<Transition>> = vec![None; self.pages.len()];
        let mut queue = VecDeque::new();
        seen[from.0] = true;
        queue.push_back(from);

        'search: while let Some(at) = queue.pop_front() {
            for &edge in &self.edges[at.0] {
                if seen[edge.to.0] {
                    continue;
                }
                seen[edge.to.0] = true;
                prev[edge.to.0] = Some(edge);
                if edge.to == to {
                    break 'search;
                }
                queue.push_back(edge.to);
            }
        }

        if !seen[to.0] {
            return Err(NavigateError::NoRoute {
                from: self.get(from).name,
                to: self.get(to).name,
            });
        }

        let mut hops = Vec::new();
        let mut at = to;
        while at != from {
            match prev[at.0] {
                Some(edge) => {
                    at = edge.from;
                    hops.push(edge);
                }
                None => break,
            }
        }
        hops.reverse();
        Ok(hops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::Rect;

    const CHECK: Locator = Locator::fixed(
        "PAGE_CHECK",
        Rect::new(0, 0, 10, 10),
        (0, 0, 0),
        "./assets/test/page_check.png",
    );
    const GO: Locator = Locator::fixed(
        "GO",
        Rect::new(0, 20, 10, 10),
        (1, 1, 1),
        "./assets/test/go.png",
    );

    fn diamond() -> (PageGraph, PageId, PageId, PageId, PageId) {
        // a -> b -> d and a -> c -> d, b registered first
        let mut g = PageGraph::new();
        let a = g.page("a", CHECK);
        let b = g.page("b", CHECK);
        let c = g.page("c", CHECK);
        let d = g.page("d", CHECK);
        g.link(a, b, GO);
        g.link(a, c, GO);
        g.link(b, d, GO);
        g.link(c, d, GO);
        (g, a, b, c, d)
    }

    #[test]
    fn test_route_to_self_is_empty() {
        let (g, a, ..) = diamond();
        assert!(g.route(a, a).unwrap().is_empty());
    }

    #[test]
    fn test_route_picks_shortest() {
        let mut g = PageGraph::new();
        let a = g.page("a", CHECK);
        let b = g.page("b", CHECK);
        let c = g.page("c", CHECK);
        // Long way round a -> b -> c plus a direct a -> c
        g.link(a, b, GO);
        g.link(b, c, GO);
        g.link(a, c, GO);
        let route = g.route(a, c).unwrap();
        assert_eq!(route.len(), 1);
        assert_eq!(route[0].to, c);
    }

    #[test]
    fn test_route_tie_breaks_by_registration_order() {
        let (g, a, b, _c, d) = diamond();
        let route = g.route(a, d).unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route[0].to, b);
        assert_eq!(route[1].to, d);
    }

    #[test]
    fn test_route_unreachable() {
        let mut g = PageGraph::new();
        let a = g.page("a", CHECK);
        let b = g.page("b", CHECK);
        // Edge points the wrong way
        g.link(b, a, GO);
        match g.route(a, b) {
            Err(NavigateError::NoRoute { from, to }) => {
                assert_eq!(from, "a");
                assert_eq!(to, "b");
            }
            other => panic!("expected NoRoute, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_page_reuses_handle() {
        let mut g = PageGraph::new();
        let first = g.page("a", CHECK);
        let again = g.page("a", CHECK);
        assert_eq!(first, again);
        assert_eq!(g.len(), 1);
    }
}
