//! Body side and its anatomical landmark mapping

use serde::Serialize;

use super::landmarks::{
    LEFT_ANKLE, LEFT_FOOT_INDEX, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER,
    RIGHT_ANKLE, RIGHT_FOOT_INDEX, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Left,
    Right,
}

/// Landmark indices for one side of the body
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SideLandmarks {
    pub shoulder: usize,
    pub hip: usize,
    pub knee: usize,
    pub ankle: usize,
    pub foot: usize,
}

impl SideLandmarks {
    pub fn as_array(&self) -> [usize; 5] {
        [self.shoulder, self.hip, self.knee, self.ankle, self.foot]
    }
}

impl Side {
    pub fn landmarks(&self) -> SideLandmarks {
        match self {
            Side::Left => SideLandmarks {
                shoulder: LEFT_SHOULDER,
                hip: LEFT_HIP,
                knee: LEFT_KNEE,
                ankle: LEFT_ANKLE,
                foot: LEFT_FOOT_INDEX,
            },
            Side::Right => SideLandmarks {
                shoulder: RIGHT_SHOULDER,
                hip: RIGHT_HIP,
                knee: RIGHT_KNEE,
                ankle: RIGHT_ANKLE,
                foot: RIGHT_FOOT_INDEX,
            },
        }
    }

    pub fn opposite(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}
