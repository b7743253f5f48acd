use serde::{Deserialize, Serialize};

pub const MAX_WAYPOINTS: usize = 3;

/// Intermediate stops entered by the user, capped at [`MAX_WAYPOINTS`].
/// Deserializing goes through the same cap, after dropping blank entries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Waypoints(Vec<String>);

impl Waypoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stop. Once the cap is reached this is a no-op returning `false`.
    pub fn add(&mut self, waypoint: impl Into<String>) -> bool {
        if self.0.len() >= MAX_WAYPOINTS {
            return false;
        }

        self.0.push(waypoint.into());
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.0.len() {
            Some(self.0.remove(index))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Waypoints {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut waypoints = Self::new();
        for waypoint in iter {
            if !waypoints.add(waypoint) {
                tracing::warn!("dropping waypoints beyond the first {}", MAX_WAYPOINTS);
                break;
            }
        }
        waypoints
    }
}

impl From<Vec<String>> for Waypoints {
    fn from(list: Vec<String>) -> Self {
        list.into_iter()
            .filter(|waypoint| !waypoint.trim().is_empty())
            .collect()
    }
}

impl From<Waypoints> for Vec<String> {
    fn from(waypoints: Waypoints) -> Self {
        waypoints.0
    }
}

#[test]
fn fourth_waypoint_is_a_no_op() {
    let mut waypoints = Waypoints::new();
    assert!(waypoints.add("a"));
    assert!(waypoints.add("b"));
    assert!(waypoints.add("c"));
    assert!(!waypoints.add("d"));
    assert_eq!(waypoints.len(), 3);
    assert_eq!(waypoints.iter().last().unwrap(), "c");
}

#[test]
fn removing_frees_a_slot() {
    let mut waypoints: Waypoints = vec!["a", "b", "c", "d"].into_iter().collect();
    assert_eq!(waypoints.len(), 3);

    assert_eq!(waypoints.remove(0).as_deref(), Some("a"));
    assert!(waypoints.remove(5).is_none());
    assert!(waypoints.add("d"));
}

#[test]
fn deserializing_keeps_the_cap() {
    let waypoints: Waypoints = serde_json::from_str(r#"["a", "b", "c", "d", "e"]"#).unwrap();
    assert_eq!(waypoints.len(), MAX_WAYPOINTS);
    assert_eq!(serde_json::to_string(&waypoints).unwrap(), r#"["a","b","c"]"#);
}

#[test]
fn blank_entries_do_not_use_up_slots() {
    let waypoints = Waypoints::from(vec![
        "".to_string(),
        " ".to_string(),
        "".to_string(),
        "Pasig".to_string(),
    ]);
    assert_eq!(waypoints.iter().collect::<Vec<_>>(), vec!["Pasig"]);
}
