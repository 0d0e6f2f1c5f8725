use serde::Serialize;

use crate::constants::{BADGE_GOLD_SESSIONS, BADGE_SILVER_SESSIONS};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTier {
    Bronze,
    Silver,
    Gold,
}

/// Recognition shown on a mentee's profile.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Badge {
    pub tier: BadgeTier,
    pub title: &'static str,
}

impl Badge {
    pub fn for_sessions(sessions: u32) -> Self {
        if sessions >= BADGE_GOLD_SESSIONS {
            Self {
                tier: BadgeTier::Gold,
                title: "Dedicated Achiever",
            }
        } else if sessions >= BADGE_SILVER_SESSIONS {
            Self {
                tier: BadgeTier::Silver,
                title: "Committed Learner",
            }
        } else {
            Self {
                tier: BadgeTier::Bronze,
                title: "Engaged Starter",
            }
        }
    }
}
