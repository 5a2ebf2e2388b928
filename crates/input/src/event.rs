use glam::Vec2;
use spinlab_common::SurfaceSize;
use std::fmt;
use std::str::FromStr;

/// One of the four motion keys that nudge the angular velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionKey {
    /// `W`: tilt up (negative pitch velocity).
    Forward,
    /// `A`: turn left (negative yaw velocity).
    Left,
    /// `S`: tilt down (positive pitch velocity).
    Back,
    /// `D`: turn right (positive yaw velocity).
    Right,
}

impl MotionKey {
    /// Map a key character to a motion key. Anything outside `wasd` is ignored.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Self::Forward),
            'a' => Some(Self::Left),
            's' => Some(Self::Back),
            'd' => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Forward => 'w',
            Self::Left => 'a',
            Self::Back => 's',
            Self::Right => 'd',
        }
    }

    /// Unit direction of the nudge as `(yaw, pitch)` signs.
    pub fn direction(self) -> Vec2 {
        match self {
            Self::Forward => Vec2::new(0.0, -1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Back => Vec2::new(0.0, 1.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// An input event delivered to the orbit controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed at the given surface coordinates.
    PointerDown(Vec2),
    /// Pointer moved; carries the surface extents for normalisation.
    PointerMove { pos: Vec2, surface: SurfaceSize },
    /// Primary button released.
    PointerUp,
    /// Pointer left the render surface.
    PointerLeave,
    /// A motion key was pressed.
    KeyPress(MotionKey),
}

/// Errors from parsing the text form of input events.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InputParseError {
    #[error("empty event")]
    Empty,
    #[error("unknown event kind: {0}")]
    UnknownKind(String),
    #[error("`{kind}` expects {expected} arguments, got {got}")]
    Arity {
        kind: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("invalid number: {0}")]
    Number(String),
    #[error("not a motion key: {0}")]
    Key(String),
}

impl FromStr for InputEvent {
    type Err = InputParseError;

    /// Parse `down X Y`, `move X Y W H`, `up`, `leave` or `key C`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let kind = parts.next().ok_or(InputParseError::Empty)?;
        let args: Vec<&str> = parts.collect();

        let arity = |kind: &'static str, expected: usize| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(InputParseError::Arity {
                    kind,
                    expected,
                    got: args.len(),
                })
            }
        };

        match kind {
            "down" => {
                arity("down", 2)?;
                Ok(Self::PointerDown(Vec2::new(number(args[0])?, number(args[1])?)))
            }
            "move" => {
                arity("move", 4)?;
                Ok(Self::PointerMove {
                    pos: Vec2::new(number(args[0])?, number(args[1])?),
                    surface: SurfaceSize::new(dimension(args[2])?, dimension(args[3])?),
                })
            }
            "up" => {
                arity("up", 0)?;
                Ok(Self::PointerUp)
            }
            "leave" => {
                arity("leave", 0)?;
                Ok(Self::PointerLeave)
            }
            "key" => {
                arity("key", 1)?;
                let mut chars = args[0].chars();
                match (chars.next().and_then(MotionKey::from_char), chars.next()) {
                    (Some(key), None) => Ok(Self::KeyPress(key)),
                    _ => Err(InputParseError::Key(args[0].to_string())),
                }
            }
            other => Err(InputParseError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PointerDown(p) => write!(f, "down {} {}", p.x, p.y),
            Self::PointerMove { pos, surface } => write!(
                f,
                "move {} {} {} {}",
                pos.x, pos.y, surface.width, surface.height
            ),
            Self::PointerUp => f.write_str("up"),
            Self::PointerLeave => f.write_str("leave"),
            Self::KeyPress(key) => write!(f, "key {}", key.as_char()),
        }
    }
}

/// Parse a `;`-separated list of events. Blank entries are skipped.
pub fn parse_script(script: &str) -> Result<Vec<InputEvent>, InputParseError> {
    script
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

fn number(s: &str) -> Result<f32, InputParseError> {
    s.parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputParseError::Number(s.to_string()))
}

fn dimension(s: &str) -> Result<u32, InputParseError> {
    s.parse::<u32>()
        .map_err(|_| InputParseError::Number(s.to_string()))
}
