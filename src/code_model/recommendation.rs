use serde::{Deserialize, Serialize};
use std::fmt;

const MOVE_PREFIX: &str = "MOVE to ";
const REVIEW_PREFIX: &str = "REVIEW (MOVE to ";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Action {
    Keep,
    KeepInterface,
    KeepSimpleDelegate,
    KeepGetterSetter,
    Move { target: String },
    Extract,
    /// Best candidate is another class but its score sits between the
    /// extract and move thresholds.
    Review { target: String },
}

impl Action {
    pub fn is_keep(&self) -> bool {
        matches!(
            self,
            Action::Keep
                | Action::KeepInterface
                | Action::KeepSimpleDelegate
                | Action::KeepGetterSetter
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Keep => write!(f, "KEEP"),
            Action::KeepInterface => write!(f, "KEEP (interface)"),
            Action::KeepSimpleDelegate => write!(f, "KEEP (simple delegate)"),
            Action::KeepGetterSetter => write!(f, "KEEP (getter/setter)"),
            Action::Move { target } => write!(f, "{}{}", MOVE_PREFIX, target),
            Action::Extract => write!(f, "EXTRACT to new class"),
            Action::Review { target } => write!(f, "{}{})", REVIEW_PREFIX, target),
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.to_string()
    }
}

impl TryFrom<String> for Action {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let action = match value.as_str() {
            "KEEP" => Action::Keep,
            "KEEP (interface)" => Action::KeepInterface,
            "KEEP (simple delegate)" => Action::KeepSimpleDelegate,
            "KEEP (getter/setter)" => Action::KeepGetterSetter,
            "EXTRACT to new class" => Action::Extract,
            other => {
                if let Some(target) = other
                    .strip_prefix(REVIEW_PREFIX)
                    .and_then(|rest| rest.strip_suffix(')'))
                {
                    Action::Review {
                        target: target.to_string(),
                    }
                } else if let Some(target) = other.strip_prefix(MOVE_PREFIX) {
                    Action::Move {
                        target: target.to_string(),
                    }
                } else {
                    return Err(format!("unknown action: {}", other));
                }
            }
        };
        Ok(action)
    }
}

/// Decision for one method. Never mutated once emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub method: String,
    pub current_class: String,
    pub best_class: String,
    pub score: f64,
    pub action: Action,
}

impl Recommendation {
    /// A decision that was not reached by competitive scoring.
    pub fn keep(method: impl Into<String>, current_class: impl Into<String>, action: Action) -> Self {
        debug_assert!(action.is_keep());
        let current_class = current_class.into();
        Recommendation {
            method: method.into(),
            best_class: current_class.clone(),
            current_class,
            score: 1.0,
            action,
        }
    }

    pub fn scored(
        method: impl Into<String>,
        current_class: impl Into<String>,
        best_class: impl Into<String>,
        score: f64,
        action: Action,
    ) -> Self {
        let current_class = current_class.into();
        if action.is_keep() {
            return Recommendation::keep(method, current_class, action);
        }
        Recommendation {
            method: method.into(),
            current_class,
            best_class: best_class.into(),
            score: round_score(score),
            action,
        }
    }
}

pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
