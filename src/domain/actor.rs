/// Actors: the player and the autonomous characters that walk the map.
///
/// An actor is an axis-aligned rectangle in world pixel coordinates,
/// `(x, y)` being the top-left corner. Actors are value-like: every
/// tick produces a new actor state, nothing mutates one in place.

/// Stable identity, assigned once at spawn. Collision self-exclusion
/// and spatial-index removal match on this, never on field equality,
/// so two actors that happen to share coordinates stay distinct.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ActorId(pub u32);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ActorKind {
    Player,
    /// Wanders to random destinations across the whole map.
    Drifter,
    /// Confined to a patrol rectangle while not in chase mode.
    Patrol,
}

/// 8-way facing, derived from the sign of the movement delta.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Facing {
    /// Vertical sign picks the prefix, horizontal sign the suffix;
    /// a purely vertical or purely horizontal move yields the
    /// single-axis label. No movement keeps the current facing.
    pub fn from_delta(dx: i32, dy: i32, current: Facing) -> Facing {
        match (dx.signum(), dy.signum()) {
            (0, -1) => Facing::Up,
            (0, 1) => Facing::Down,
            (-1, 0) => Facing::Left,
            (1, 0) => Facing::Right,
            (-1, -1) => Facing::UpLeft,
            (1, -1) => Facing::UpRight,
            (-1, 1) => Facing::DownLeft,
            (1, 1) => Facing::DownRight,
            _ => current,
        }
    }
}

/// A point in world pixel coordinates (NPC destinations).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Patrol rectangle expressed as fractions of world size.
/// A patrol actor at or beyond any of these bounds (outside chase
/// mode) is pushed back as if it had collided.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct PatrolBounds {
    pub max_left: f32,
    pub max_right: f32,
    pub max_up: f32,
    pub max_down: f32,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub speed: i32,
    pub facing: Facing,
    pub has_collision: bool,
    /// Where this actor is headed (NPCs only; the player has none).
    pub destination: Option<Point>,
    /// Nominal speed stashed while the spawn ramp is active.
    pub fallback_speed: Option<i32>,
    /// Freshly spawned: moves at an inflated speed until its first
    /// collision-free move clears it of whatever it spawned inside.
    pub is_new: bool,
    /// Patrol rectangle (Patrol kind only).
    pub patrol: Option<PatrolBounds>,
}

impl Actor {
    pub fn new(id: ActorId, kind: ActorKind, x: i32, y: i32, width: i32, height: i32, speed: i32) -> Self {
        Actor {
            id,
            kind,
            x,
            y,
            width,
            height,
            speed,
            facing: Facing::Down,
            has_collision: false,
            destination: None,
            fallback_speed: None,
            is_new: false,
            patrol: None,
        }
    }

    /// Center of the rectangle, rounded the way movement deltas are
    /// measured.
    pub fn center(&self) -> (i32, i32) {
        (self.x + (self.width + 1) / 2, self.y + (self.height + 1) / 2)
    }
}

/// Everything a single tick needs from the outside: directional input
/// for the player plus the global control flags. Built fresh each
/// frame by the input layer; the simulation never reads globals.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Freezes character decisions; the player still moves.
    pub paused: bool,
    /// Chase mode: NPC destinations become the player's position.
    pub attack: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_single_axis() {
        assert_eq!(Facing::from_delta(0, -3, Facing::Down), Facing::Up);
        assert_eq!(Facing::from_delta(5, 0, Facing::Down), Facing::Right);
    }

    #[test]
    fn facing_diagonal() {
        assert_eq!(Facing::from_delta(-2, 4, Facing::Up), Facing::DownLeft);
        assert_eq!(Facing::from_delta(1, -1, Facing::Up), Facing::UpRight);
    }

    #[test]
    fn facing_no_move_keeps_current() {
        assert_eq!(Facing::from_delta(0, 0, Facing::Left), Facing::Left);
    }

    #[test]
    fn center_rounds_up_on_odd_sizes() {
        let a = Actor::new(ActorId(1), ActorKind::Drifter, 10, 10, 5, 4, 2);
        assert_eq!(a.center(), (13, 12));
    }
}
