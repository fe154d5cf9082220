//! Greedy route planner toward a fixed destination.

use serde::{Deserialize, Serialize};

use super::geometry::{Heading, Location};
use crate::traffic::Action;

/// Suggests the next turn toward the destination: close the east-west gap
/// first, then the north-south gap. It never plans through the wrap-around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePlanner {
    destination: Location,
}

impl RoutePlanner {
    pub fn new(destination: Location) -> Self {
        Self { destination }
    }

    pub fn destination(&self) -> Location {
        self.destination
    }

    /// Next heading for a car at `location` facing `heading`.
    ///
    /// Returns [`Action::None`] at the destination.
    pub fn next_waypoint(&self, location: Location, heading: Heading) -> Action {
        let dx = self.destination.x - location.x;
        let dy = self.destination.y - location.y;
        let (hx, hy) = heading.delta();

        if dx == 0 && dy == 0 {
            Action::None
        } else if dx != 0 {
            if dx * hx > 0 {
                Action::Forward
            } else if dx * hx < 0 {
                // Facing away: go round the block
                Action::Right
            } else if dx * hy > 0 {
                Action::Left
            } else {
                Action::Right
            }
        } else if dy * hy > 0 {
            Action::Forward
        } else if dy * hy < 0 {
            Action::Right
        } else if dy * hx > 0 {
            Action::Right
        } else {
            Action::Left
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrived() {
        let planner = RoutePlanner::new(Location::new(3, 3));
        assert_eq!(
            planner.next_waypoint(Location::new(3, 3), Heading::North),
            Action::None
        );
    }

    #[test]
    fn test_straight_ahead() {
        let planner = RoutePlanner::new(Location::new(5, 2));
        assert_eq!(
            planner.next_waypoint(Location::new(1, 2), Heading::East),
            Action::Forward
        );
    }

    #[test]
    fn test_turns_toward_destination() {
        let planner = RoutePlanner::new(Location::new(5, 2));
        // Facing south with the destination to the east: turn left
        assert_eq!(
            planner.next_waypoint(Location::new(1, 2), Heading::South),
            Action::Left
        );
        // Facing north with the destination to the east: turn right
        assert_eq!(
            planner.next_waypoint(Location::new(1, 2), Heading::North),
            Action::Right
        );
        // Same column, destination south, facing east: turn right
        let planner = RoutePlanner::new(Location::new(1, 5));
        assert_eq!(
            planner.next_waypoint(Location::new(1, 2), Heading::East),
            Action::Right
        );
    }

    #[test]
    fn test_following_waypoints_reaches_destination() {
        let destination = Location::new(6, 4);
        let planner = RoutePlanner::new(destination);
        let mut location = Location::new(1, 1);
        let mut heading = Heading::West;
        for _ in 0..40 {
            match planner.next_waypoint(location, heading) {
                Action::None => break,
                Action::Forward => {}
                Action::Left => heading = heading.turn_left(),
                Action::Right => heading = heading.turn_right(),
            }
            location = location.step(heading, 8, 6);
        }
        assert_eq!(location, destination);
    }
}
