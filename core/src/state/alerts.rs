use serde::{Deserialize, Serialize};

/// Active alerts in the order they were raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertBoard {
    alerts: Vec<String>,
}

impl AlertBoard {
    pub fn raise(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
    }

    /// Appends only when the identical message is not already active.
    pub fn raise_once(&mut self, message: &str) -> bool {
        if self.contains(message) {
            return false;
        }
        self.alerts.push(message.to_string());
        true
    }

    /// Drops every alert, returning how many were active.
    pub fn clear(&mut self) -> usize {
        let cleared = self.alerts.len();
        self.alerts.clear();
        cleared
    }

    pub fn contains(&self, message: &str) -> bool {
        self.alerts.iter().any(|alert| alert == message)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.alerts
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_once_skips_active_duplicates() {
        let mut board = AlertBoard::default();
        assert!(board.raise_once("intruder"));
        assert!(!board.raise_once("intruder"));
        board.raise("intruder");
        assert_eq!(board.len(), 2);
        assert_eq!(board.clear(), 2);
        assert!(board.raise_once("intruder"));
    }
}
