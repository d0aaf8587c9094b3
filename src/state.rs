use crate::canvas::ActiveStroke;

/// What the surface is doing between input events.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    Stroking(ActiveStroke),
}

impl InteractionState {
    pub fn is_stroking(&self) -> bool {
        matches!(self, Self::Stroking(_))
    }

    pub fn stroke_mut(&mut self) -> Option<&mut ActiveStroke> {
        match self {
            Self::Stroking(stroke) => Some(stroke),
            Self::Idle => None,
        }
    }

    /// Leave the stroking state, handing back the stroke if there was one.
    pub fn take_stroke(&mut self) -> Option<ActiveStroke> {
        match std::mem::take(self) {
            Self::Stroking(stroke) => Some(stroke),
            Self::Idle => None,
        }
    }
}
