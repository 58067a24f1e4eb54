/// Tri-state reading of one input axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AxisMovement {
    #[default]
    Null,
    Forward,
    Backward,
    Left,
    Right,
}

/// Decoded controls for one tic. Built once before the tic runs and never
/// changed while it runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub x_movement: AxisMovement,    // Left / Right turn
    pub z_movement: AxisMovement,    // Forward / Backward
    pub step_movement: AxisMovement, // Left / Right sidestep
    pub jump: bool,
    pub action: bool,
    pub move_slow: bool, // walk modifier
    pub roll: bool,
}

impl InputState {
    #[inline]
    pub fn forward(mut self) -> Self {
        self.z_movement = AxisMovement::Forward;
        self
    }

    #[inline]
    pub fn backward(mut self) -> Self {
        self.z_movement = AxisMovement::Backward;
        self
    }

    #[inline]
    pub fn with_action(mut self) -> Self {
        self.action = true;
        self
    }

    #[inline]
    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }

    #[inline]
    pub fn slow(mut self) -> Self {
        self.move_slow = true;
        self
    }
}

/// Inventory item type as stored in the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemType(pub u16);
