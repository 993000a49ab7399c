//! Rally-rate proxies for events without point ids
//!
//! Without point ids there are no rallies to classify. A reception followed
//! by our next attack stands in for a completed receiving rally, and a kill
//! on that attack for a won one. Serving is approximated by aces over
//! serves. Everything produced here is a [`Provenance::ProxyEstimate`].

use crate::strategy::RallyStrategyProperties;
use serde::Serialize;
use std::collections::BTreeMap;
use volley_core::{Action, Event, Outcome, Provenance, Rotation};

/// Proxy counts for one (set, rotation)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AdjacencyEstimate {
    pub receives_with_attacks: u64,
    pub kills_after_receive: u64,
    pub serves: u64,
    pub aces: u64,
}

impl AdjacencyEstimate {
    pub fn merge(&mut self, other: &AdjacencyEstimate) {
        self.receives_with_attacks += other.receives_with_attacks;
        self.kills_after_receive += other.kills_after_receive;
        self.serves += other.serves;
        self.aces += other.aces;
    }

    pub fn is_empty(&self) -> bool {
        self.receives_with_attacks == 0 && self.serves == 0
    }
}

/// Reception→attack adjacency over loose events
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjacencyFallback;

impl RallyStrategyProperties for AdjacencyFallback {
    fn strategy_name(&self) -> &'static str {
        "adjacency"
    }

    fn provenance(&self) -> Provenance {
        Provenance::ProxyEstimate
    }
}

impl AdjacencyFallback {
    /// Estimate per (set, rotation).
    ///
    /// Events keep their relative order within each (set, rotation) run.
    /// Sets may sit between the reception and the attack; any other action
    /// closes the window.
    pub fn estimate<'a, I>(&self, events: I) -> BTreeMap<(u32, Rotation), AdjacencyEstimate>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut estimates: BTreeMap<(u32, Rotation), AdjacencyEstimate> = BTreeMap::new();
        let mut open: BTreeMap<(u32, Rotation), bool> = BTreeMap::new();

        for event in events {
            let key = (event.set_number, event.rotation);
            let estimate = estimates.entry(key).or_default();
            let window = open.entry(key).or_insert(false);

            match event.action {
                Action::Receive => *window = event.outcome != Outcome::Error,
                Action::Set => {}
                Action::Attack => {
                    if *window {
                        estimate.receives_with_attacks += 1;
                        if event.outcome == Outcome::Kill {
                            estimate.kills_after_receive += 1;
                        }
                    }
                    *window = false;
                }
                Action::Serve => {
                    estimate.serves += 1;
                    if event.outcome == Outcome::Ace {
                        estimate.aces += 1;
                    }
                    *window = false;
                }
                Action::Block | Action::Dig => *window = false,
            }
        }

        estimates.retain(|_, e| !e.is_empty());
        estimates
    }
}
