//! Screen detection and routed navigation
//!
//! The [`Navigator`] closes the loop between the page graph and a live
//! device: figure out which screen is up, plan a route, then walk it
//! hop by hop, re-tapping patiently and confirming each arrival before
//! moving on.

use crate::config::NavigationSettings;
use crate::device::Device;
use crate::poll::{ActionLoop, Rule, Timer, Verdict};
use crate::ui::page::{PageGraph, PageId, Transition};
use crate::ui::NavigateError;
use crate::vision::{Frame, LocateOpts, Locator};

/// Lookup options used for page checks
fn check_opts() -> LocateOpts {
    LocateOpts::default().with_offset(5)
}

/// Drives a device along the page graph
pub struct Navigator<'g> {
    graph: &'g PageGraph,
    nav: NavigationSettings,
}

impl<'g> Navigator<'g> {
    /// Navigator over `graph` with the given patience settings
    pub fn new(graph: &'g PageGraph, nav: NavigationSettings) -> Self {
        Self { graph, nav }
    }

    /// Which registered page is on `frame`, if any
    ///
    /// Checks are probed in registration order and the first hit wins,
    /// so earlier pages shadow later ones when anchors overlap.
    pub fn detect(&self, dev: &mut dyn Device, frame: &Frame) -> Option<PageId> {
        for (id, page) in self.graph.pages() {
            if dev.locate(&page.check, frame, check_opts()).is_some() {
                return Some(id);
            }
        }
        None
    }

    /// Poll until any known page shows up
    ///
    /// Loading screens and transition animations detect as nothing, so
    /// this simply keeps capturing until a check matches or patience
    /// runs out.
    pub fn wait_for_page(&self, dev: &mut dyn Device) -> Result<(PageId, Frame), NavigateError> {
        for _ in 0..self.nav.detect_passes {
            let frame = dev.capture()?;
            if let Some(id) = self.detect(dev, &frame) {
                log::debug!("on page {}", self.graph.get(id).name);
                return Ok((id, frame));
            }
        }
        Err(NavigateError::Timeout {
            waiting_for: "any known page",
        })
    }

    /// Bring the device to `target`, wherever it currently is
    pub fn ensure(&self, dev: &mut dyn Device, target: PageId) -> Result<(), NavigateError> {
        let (at, frame) = self.wait_for_page(dev)?;
        if at == target {
            log::debug!("already on {}", self.graph.get(target).name);
            return Ok(());
        }

        let route = self.graph.route(at, target)?;
        log::info!(
            "navigating {} -> {} in {} hops",
            self.graph.get(at).name,
            self.graph.get(target).name,
            route.len()
        );

        let mut seed = Some(frame);
        for hop in route {
            self.hop(dev, hop, seed.take())?;
            // Arrival settles the screen, start the next hop clean
            dev.clear_input_history();
            dev.clear_stuck_detector();
        }
        Ok(())
    }

    /// Walk a single edge and confirm the landing
    fn hop(
        &self,
        dev: &mut dyn Device,
        hop: Transition,
        seed: Option<Frame>,
    ) -> Result<(), NavigateError> {
        let dst = *self.graph.get(hop.to);
        let check = dst.check;
        let stable = check_opts().require_stable();

        // Any page other than the endpoints means the tap went astray
        let others: Vec<Locator> = self
            .graph
            .pages()
            .filter(|(id, _)| *id != hop.from && *id != hop.to)
            .map(|(_, p)| p.check)
            .collect();

        let verdict = ActionLoop::new(dst.name, move |dev, frame, _| {
            dev.locate(&check, frame, stable).is_some()
        })
        .with_confirm(Timer::from_millis(self.nav.confirm_ms).with_count(self.nav.confirm_count))
        .with_failure("page-lost", move |dev, frame, _| {
            others
                .iter()
                .any(|c| dev.locate(c, frame, check_opts()).is_some())
        })
        .with_rule(Rule::tap_on_with(
            hop.trigger,
            Timer::from_millis(self.nav.retap_ms),
            check_opts(),
        ))
        .with_pass_limit(self.nav.hop_passes)
        .run(dev, &mut (), seed)?;

        match verdict {
            Verdict::Success => {
                log::info!("arrived on {}", dst.name);
                Ok(())
            }
            Verdict::Failed(_) => {
                let frame = dev.capture()?;
                let found = self
                    .detect(dev, &frame)
                    .map_or("unknown", |id| self.graph.get(id).name);
                log::warn!("expected {}, found {found}", dst.name);
                Err(NavigateError::Lost {
                    expected: dst.name,
                    found,
                })
            }
            Verdict::TimedOut => Err(NavigateError::Timeout {
                waiting_for: dst.name,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::sim::{SimDevice, SimScreen};
    use crate::ui::assets::*;
    use crate::ui::map::Pages;
    use crate::vision::Perceptor;
    use std::time::Duration;

    fn fast_nav() -> NavigationSettings {
        NavigationSettings {
            detect_passes: 40,
            hop_passes: 200,
            retap_ms: 120,
            confirm_ms: 40,
            confirm_count: 2,
        }
    }

    fn sim_world() -> SimDevice {
        SimDevice::new("main")
            .with_frame_interval(Duration::from_millis(2))
            .with_screen(
                SimScreen::new("main")
                    .shows(MAIN_CHECK.name())
                    .shows(MAIN_GOTO_ARK.name()),
            )
            .with_screen(
                SimScreen::new("ark")
                    .shows(ARK_CHECK.name())
                    .shows(ARK_GOTO_ARENA.name())
                    .shows(GOTO_BACK.name()),
            )
            .with_screen(
                SimScreen::new("arena")
                    .shows(ARENA_CHECK.name())
                    .shows(GOTO_BACK.name())
                    .shows(GOTO_MAIN.name()),
            )
            .with_link("main", MAIN_GOTO_ARK.button(), "ark", 1)
            .with_link("ark", ARK_GOTO_ARENA.button(), "arena", 1)
            .with_link("arena", GOTO_MAIN.button(), "main", 1)
    }

    #[test]
    fn test_detect_prefers_registration_order() {
        let pages = Pages::standard();
        let nav = Navigator::new(&pages.graph, fast_nav());
        let mut dev = sim_world();
        let frame = dev.capture().unwrap();
        assert_eq!(nav.detect(&mut dev, &frame), Some(pages.main));
    }

    #[test]
    fn test_ensure_walks_two_hops() {
        let pages = Pages::standard();
        let nav = Navigator::new(&pages.graph, fast_nav());
        let mut dev = sim_world();
        nav.ensure(&mut dev, pages.arena).unwrap();
        assert_eq!(dev.screen(), "arena");
        assert_eq!(dev.taps().len(), 2);
        assert_eq!(dev.input_clears(), 2);
        assert_eq!(dev.stuck_clears(), 2);
    }

    #[test]
    fn test_ensure_is_idempotent_on_target() {
        let pages = Pages::standard();
        let nav = Navigator::new(&pages.graph, fast_nav());
        let mut dev = sim_world();
        nav.ensure(&mut dev, pages.main).unwrap();
        assert!(dev.taps().is_empty());
    }

    #[test]
    fn test_return_home_uses_direct_edge() {
        let pages = Pages::standard();
        let nav = Navigator::new(&pages.graph, fast_nav());
        let mut dev = sim_world();
        nav.ensure(&mut dev, pages.arena).unwrap();
        let taps_so_far = dev.taps().len();
        nav.ensure(&mut dev, pages.main).unwrap();
        assert_eq!(dev.screen(), "main");
        assert_eq!(dev.taps().len(), taps_so_far + 1);
    }

    #[test]
    fn test_wait_for_page_times_out_on_unknown() {
        let pages = Pages::standard();
        let nav = Navigator::new(
            &pages.graph,
            NavigationSettings {
                detect_passes: 5,
                ..fast_nav()
            },
        );
        let mut dev = SimDevice::new("void")
            .with_frame_interval(Duration::from_millis(1))
            .with_screen(SimScreen::new("void"));
        match nav.ensure(&mut dev, pages.main) {
            Err(NavigateError::Timeout { waiting_for }) => {
                assert_eq!(waiting_for, "any known page");
            }
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_hop_to_dead_screen_times_out() {
        let pages = Pages::standard();
        let nav = Navigator::new(
            &pages.graph,
            NavigationSettings {
                hop_passes: 15,
                ..fast_nav()
            },
        );
        // The ark tap lands on a screen with no anchors at all
        let mut dev = SimDevice::new("main")
            .with_frame_interval(Duration::from_millis(1))
            .with_screen(
                SimScreen::new("main")
                    .shows(MAIN_CHECK.name())
                    .shows(MAIN_GOTO_ARK.name()),
            )
            .with_screen(SimScreen::new("void"))
            .with_link("main", MAIN_GOTO_ARK.button(), "void", 0);
        match nav.ensure(&mut dev, pages.ark) {
            Err(NavigateError::Timeout { waiting_for }) => assert_eq!(waiting_for, "ark"),
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    #[test]
    fn test_hop_landing_elsewhere_reports_lost() {
        let pages = Pages::standard();
        let nav = Navigator::new(&pages.graph, fast_nav());
        // The ark tap is wired to the shop screen instead
        let mut dev = SimDevice::new("main")
            .with_frame_interval(Duration::from_millis(2))
            .with_screen(
                SimScreen::new("main")
                    .shows(MAIN_CHECK.name())
                    .shows(MAIN_GOTO_ARK.name()),
            )
            .with_screen(SimScreen::new("shop").shows(SHOP_CHECK.name()))
            .with_link("main", MAIN_GOTO_ARK.button(), "shop", 1);
        match nav.ensure(&mut dev, pages.ark) {
            Err(NavigateError::Lost { expected, found }) => {
                assert_eq!(expected, "ark");
                assert_eq!(found, "shop");
            }
            other => panic!("expected Lost, got {other:?}"),
        }
    }
}
