//! Grid world implementing the [`Environment`] port.

use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use super::{
    geometry::{Heading, Location},
    planner::RoutePlanner,
};
use crate::{
    Error, Result,
    ports::{
        Environment,
        environment::{
            REWARD_ARRIVAL_BONUS, REWARD_ILLEGAL, REWARD_OFF_ROUTE, REWARD_ON_ROUTE, REWARD_WAIT,
        },
    },
    traffic::{Action, Light, Percept, is_legal},
};

/// Shape and difficulty of the grid world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Intersections along the east-west axis
    pub width: i32,
    /// Intersections along the north-south axis
    pub height: i32,
    /// Rule-abiding background cars
    pub dummy_cars: usize,
    /// Deadline per block of trip distance
    pub deadline_factor: i64,
    /// Minimum Manhattan distance between start and destination
    pub min_distance: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 6,
            dummy_cars: 3,
            deadline_factor: 5,
            min_distance: 4,
        }
    }
}

impl WorldConfig {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the grid cannot host a trip
    /// of `min_distance` blocks.
    pub fn validate(&self) -> Result<()> {
        if self.width < 2 || self.height < 2 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "grid must be at least 2x2, got {}x{}",
                    self.width, self.height
                ),
            });
        }
        if self.deadline_factor < 1 {
            return Err(Error::InvalidConfiguration {
                message: format!("deadline factor must be positive, got {}", self.deadline_factor),
            });
        }
        let longest = (self.width - 1) + (self.height - 1);
        if self.min_distance < 1 || self.min_distance > longest {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "minimum trip distance {} impossible on a {}x{} grid (1..={longest})",
                    self.min_distance, self.width, self.height
                ),
            });
        }
        Ok(())
    }
}

/// A signal that alternates between north-south and east-west green.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Intersection {
    vertical_green: bool,
    period: u32,
    last_switch: u32,
}

impl Intersection {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            vertical_green: rng.random(),
            period: rng.random_range(3..=5),
            last_switch: 0,
        }
    }

    fn update(&mut self, t: u32) {
        if t - self.last_switch >= self.period {
            self.vertical_green = !self.vertical_green;
            self.last_switch = t;
        }
    }

    fn light_for(&self, heading: Heading) -> Light {
        if heading.is_vertical() == self.vertical_green {
            Light::Green
        } else {
            Light::Red
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Car {
    location: Location,
    heading: Heading,
    /// Turn this car announces to the others at its intersection
    intent: Action,
}

/// Which car a percept or move is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CarId {
    Primary,
    Dummy(usize),
}

fn random_intent<R: Rng + ?Sized>(rng: &mut R) -> Action {
    *[Action::Forward, Action::Left, Action::Right]
        .choose(rng)
        .unwrap_or(&Action::Forward)
}

/// Wrap-around grid of signalised intersections.
///
/// Trips (lights, start, destination, initial traffic) come from one random
/// stream and background-car turns from another, reseeded at every reset.
/// Two worlds with the same seed therefore pose the same sequence of trips
/// whatever the cab does in them.
#[derive(Debug, Clone)]
pub struct GridWorld {
    config: WorldConfig,
    intersections: Vec<Intersection>,
    primary: Option<Car>,
    planner: RoutePlanner,
    dummies: Vec<Car>,
    deadline: i64,
    t: u32,
    trials_started: usize,
    trip_rng: StdRng,
    traffic_rng: StdRng,
}

impl GridWorld {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an unusable grid.
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        let mut trip_rng = StdRng::from_rng(&mut rand::rng());
        let intersections = Self::fresh_intersections(&config, &mut trip_rng);
        let traffic_rng = StdRng::seed_from_u64(trip_rng.random());
        Ok(Self {
            config,
            intersections,
            primary: None,
            planner: RoutePlanner::new(Location::new(0, 0)),
            dummies: Vec::new(),
            deadline: 0,
            t: 0,
            trials_started: 0,
            trip_rng,
            traffic_rng,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.trip_rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Current cab location, if a trial is running.
    pub fn location(&self) -> Option<Location> {
        self.primary.map(|car| car.location)
    }

    pub fn destination(&self) -> Location {
        self.planner.destination()
    }

    fn fresh_intersections<R: Rng + ?Sized>(config: &WorldConfig, rng: &mut R) -> Vec<Intersection> {
        (0..config.width * config.height)
            .map(|_| Intersection::random(rng))
            .collect()
    }

    fn intersection(&self, location: Location) -> &Intersection {
        &self.intersections[(location.y * self.config.width + location.x) as usize]
    }

    fn random_location(&mut self) -> Location {
        Location::new(
            self.trip_rng.random_range(0..self.config.width),
            self.trip_rng.random_range(0..self.config.height),
        )
    }

    fn random_heading(&mut self) -> Heading {
        *Heading::ALL
            .choose(&mut self.trip_rng)
            .unwrap_or(&Heading::North)
    }

    fn car(&self, id: CarId) -> Option<Car> {
        match id {
            CarId::Primary => self.primary,
            CarId::Dummy(i) => self.dummies.get(i).copied(),
        }
    }

    fn others(&self, id: CarId) -> impl Iterator<Item = Car> + '_ {
        let primary = self.primary.filter(|_| id != CarId::Primary);
        let dummies = self
            .dummies
            .iter()
            .enumerate()
            .filter(move |(i, _)| id != CarId::Dummy(*i))
            .map(|(_, car)| *car);
        primary.into_iter().chain(dummies)
    }

    /// What `id` senses at its intersection.
    fn percept_for(&self, id: CarId) -> Percept {
        let Some(me) = self.car(id) else {
            return Percept::clear(Light::Red);
        };
        let mut percept = Percept::clear(self.intersection(me.location).light_for(me.heading));

        for other in self.others(id) {
            if other.location != me.location || other.heading == me.heading {
                continue;
            }
            let intent = Some(other.intent);
            if other.heading == me.heading.opposite() {
                if percept.oncoming != Some(Action::Left) {
                    percept.oncoming = intent;
                }
            } else if other.heading == me.heading.turn_left() {
                // Travelling towards our left means it arrived from our right
                if !matches!(percept.right, Some(Action::Forward | Action::Left)) {
                    percept.right = intent;
                }
            } else if percept.left != Some(Action::Forward) {
                percept.left = intent;
            }
        }
        percept
    }

    /// Apply `action` to a car if legal; returns whether it was legal.
    fn drive(&mut self, id: CarId, action: Action) -> bool {
        let percept = self.percept_for(id);
        if !is_legal(&percept, action) {
            return false;
        }
        let (width, height) = (self.config.width, self.config.height);
        let car = match id {
            CarId::Primary => self.primary.as_mut(),
            CarId::Dummy(i) => self.dummies.get_mut(i),
        };
        if let Some(car) = car {
            car.heading = match action {
                Action::Left => car.heading.turn_left(),
                Action::Right => car.heading.turn_right(),
                Action::Forward | Action::None => car.heading,
            };
            if action.is_move() {
                car.location = car.location.step(car.heading, width, height);
            }
        }
        true
    }

    fn refresh_primary_intent(&mut self) {
        if let Some(car) = self.primary.as_mut() {
            car.intent = self.planner.next_waypoint(car.location, car.heading);
        }
    }

    /// Lights and background traffic move on one tick.
    fn advance(&mut self) {
        self.t += 1;
        let t = self.t;
        for intersection in &mut self.intersections {
            intersection.update(t);
        }
        for i in 0..self.dummies.len() {
            let intent = self.dummies[i].intent;
            if self.drive(CarId::Dummy(i), intent) {
                self.dummies[i].intent = random_intent(&mut self.traffic_rng);
            }
        }
        self.refresh_primary_intent();
    }
}

impl Environment for GridWorld {
    fn reset(&mut self) -> Result<()> {
        self.t = 0;
        let config = self.config;
        self.intersections = Self::fresh_intersections(&config, &mut self.trip_rng);

        let (start, destination) = loop {
            let start = self.random_location();
            let destination = self.random_location();
            if start.distance(&destination) >= config.min_distance {
                break (start, destination);
            }
        };
        self.planner = RoutePlanner::new(destination);
        let heading = self.random_heading();
        self.primary = Some(Car {
            location: start,
            heading,
            intent: self.planner.next_waypoint(start, heading),
        });
        self.deadline = i64::from(start.distance(&destination)) * config.deadline_factor;

        self.dummies.clear();
        for _ in 0..config.dummy_cars {
            let car = Car {
                location: self.random_location(),
                heading: self.random_heading(),
                intent: random_intent(&mut self.trip_rng),
            };
            self.dummies.push(car);
        }

        self.traffic_rng = StdRng::seed_from_u64(self.trip_rng.random());
        self.trials_started += 1;
        info!(
            "trial {} start: {start:?} -> {destination:?}, deadline {}",
            self.trials_started, self.deadline
        );
        Ok(())
    }

    fn sense(&self) -> Percept {
        self.percept_for(CarId::Primary)
    }

    fn deadline(&self) -> i64 {
        self.deadline
    }

    fn next_waypoint(&self) -> Action {
        self.primary
            .map_or(Action::None, |car| self.planner.next_waypoint(car.location, car.heading))
    }

    fn act(&mut self, action: Action) -> Result<f64> {
        if self.primary.is_none() {
            return Err(Error::WorldNotReset);
        }
        let waypoint = self.next_waypoint();

        let mut reward = if !self.drive(CarId::Primary, action) {
            REWARD_ILLEGAL
        } else if !action.is_move() {
            REWARD_WAIT
        } else if action == waypoint {
            REWARD_ON_ROUTE
        } else {
            REWARD_OFF_ROUTE
        };

        if self.location() == Some(self.planner.destination()) {
            if self.deadline >= 0 {
                reward += REWARD_ARRIVAL_BONUS;
            }
            debug!("destination reached with deadline {}", self.deadline);
            self.primary = None;
        } else {
            self.advance();
        }
        self.deadline -= 1;
        Ok(reward)
    }
}
