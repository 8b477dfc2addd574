//! Opponent scoring and selection
//!
//! Competitive screens offer a short list of opponents with a few
//! numeric attributes each. Every attribute is min-max normalized over
//! the board so weights stay comparable across wildly different scales,
//! rank-like attributes are inverted so that better always means
//! higher, and the weighted sum orders the board. A [`Strategy`] then
//! picks from that ordering.

use std::collections::HashMap;
use std::str::FromStr;

use rand::Rng;

/// One opponent slot and its measured attributes
#[derive(Debug, Clone)]
pub struct Candidate {
    /// 1-based slot position on the screen
    pub slot: usize,
    attributes: HashMap<String, i64>,
}

impl Candidate {
    /// Empty candidate for `slot`
    pub fn new(slot: usize) -> Self {
        Self {
            slot,
            attributes: HashMap::new(),
        }
    }

    /// Attach an attribute value
    pub fn with_attr(mut self, name: impl Into<String>, value: i64) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Look up an attribute
    pub fn attr(&self, name: &str) -> Option<i64> {
        self.attributes.get(name).copied()
    }
}

/// One scored attribute and its weight
#[derive(Debug, Clone)]
pub struct ScoreDimension {
    /// Attribute name, matching [`Candidate`] attributes
    pub name: String,
    /// Contribution of this attribute to the total
    pub weight: f64,
    /// Whether smaller raw values are better, e.g. rankings
    pub invert: bool,
}

impl ScoreDimension {
    /// Dimension where bigger raw values are better
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            invert: false,
        }
    }

    /// Dimension where smaller raw values are better
    pub fn inverted(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            invert: true,
        }
    }
}

/// Which entry of the scored board to pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Strongest opponent
    Max,
    /// Weakest opponent
    Min,
    /// Neither extreme, picked at random from the interior
    Middle,
}

impl FromStr for Strategy {
    type Err = SelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Max" => Ok(Self::Max),
            "Min" => Ok(Self::Min),
            "Middle" => Ok(Self::Middle),
            other => Err(SelectError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Selection failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    #[error("no opponents on the board")]
    NoCandidates,
    #[error("unknown selection strategy {0:?}")]
    UnknownStrategy(String),
}

/// Score the board, strongest first
///
/// Per dimension, values are min-max normalized over the candidates
/// that carry the attribute; an all-equal dimension scores everyone
/// 0.5, a candidate missing the attribute scores zero for it, and a
/// dimension nobody carries scores everyone 0.5. Ties in the final
/// ordering fall to the lower slot.
pub fn rank(
    candidates: &[Candidate],
    dims: &[ScoreDimension],
) -> Result<Vec<(usize, f64)>, SelectError> {
    if candidates.is_empty() {
        return Err(SelectError::NoCandidates);
    }

    let mut scores = vec![0.0f64; candidates.len()];
    for dim in dims {
        let present: Vec<i64> = candidates.iter().filter_map(|c| c.attr(&dim.name)).collect();
        let Some(lo) = present.iter().copied().min() else {
            // Nobody carries this attribute, it cannot differentiate
            for score in &mut scores {
                *score += dim.weight * 0.5;
            }
            continue;
        };
        let hi = present.iter().copied().max().unwrap_or(lo);

        for (score, candidate) in scores.iter_mut().zip(candidates) {
            let normalized = match candidate.attr(&dim.name) {
                Some(v) => {
                    let n = if hi == lo {
                        0.5
                    } else {
                        (v - lo) as f64 / (hi - lo) as f64
                    };
                    if dim.invert {
                        1.0 - n
                    } else {
                        n
                    }
                }
                None => 0.0,
            };
            *score += dim.weight * normalized;
        }
    }

    let mut board: Vec<(usize, f64)> = candidates
        .iter()
        .map(|c| c.slot)
        .zip(scores)
        .collect();
    board.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    log::debug!("opponent board: {board:?}");
    Ok(board)
}

/// Pick a slot from a scored board
///
/// `Middle` avoids both extremes and draws uniformly from the interior;
/// with fewer than three entries there is no interior and it falls back
/// to the weakest.
pub fn choose(board: &[(usize, f64)], strategy: Strategy) -> Option<usize> {
    if board.is_empty() {
        return None;
    }
    let picked = match strategy {
        Strategy::Max => board[0].0,
        Strategy::Min => board[board.len() - 1].0,
        Strategy::Middle => {
            if board.len() < 3 {
                board[board.len() - 1].0
            } else {
                let i = rand::rng().random_range(1..board.len() - 1);
                board[i].0
            }
        }
    };
    log::info!("strategy {strategy:?} picked slot {picked}");
    Some(picked)
}

/// Score and pick in one call
pub fn select(
    candidates: &[Candidate],
    dims: &[ScoreDimension],
    strategy: Strategy,
) -> Result<usize, SelectError> {
    let board = rank(candidates, dims)?;
    choose(&board, strategy).ok_or(SelectError::NoCandidates)
}
