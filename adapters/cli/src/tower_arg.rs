use std::str::FromStr;

use firewall_defence_core::{ParseKindError, Position, TowerKind};
use thiserror::Error;

/// Tower placement requested on the command line as `kind@x,y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TowerArg {
    pub(crate) kind: TowerKind,
    pub(crate) position: Position,
}

/// Errors raised while parsing a `kind@x,y` placement argument.
#[derive(Debug, Error)]
pub(crate) enum PlacementArgError {
    /// The argument lacks the `@` between kind and coordinates.
    #[error("expected `kind@x,y`, got `{0}`")]
    MissingSeparator(String),
    /// The coordinates lack the `,` between x and y.
    #[error("expected coordinates as `x,y`, got `{0}`")]
    MissingCoordinate(String),
    /// A coordinate is not a finite number.
    #[error("invalid coordinate `{0}`")]
    InvalidCoordinate(String),
    /// The kind name is not a known tower.
    #[error(transparent)]
    UnknownKind(#[from] ParseKindError),
}

impl FromStr for TowerArg {
    type Err = PlacementArgError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (kind, coordinates) = value
            .split_once('@')
            .ok_or_else(|| PlacementArgError::MissingSeparator(value.to_owned()))?;
        let (x, y) = coordinates
            .split_once(',')
            .ok_or_else(|| PlacementArgError::MissingCoordinate(coordinates.to_owned()))?;

        Ok(Self {
            kind: kind.parse()?,
            position: Position::new(parse_coordinate(x)?, parse_coordinate(y)?),
        })
    }
}

fn parse_coordinate(value: &str) -> Result<f32, PlacementArgError> {
    let trimmed = value.trim();
    trimmed
        .parse::<f32>()
        .ok()
        .filter(|coordinate| coordinate.is_finite())
        .ok_or_else(|| PlacementArgError::InvalidCoordinate(trimmed.to_owned()))
}
