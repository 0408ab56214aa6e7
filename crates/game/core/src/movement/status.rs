use strum::IntoStaticStr;

/// Movement state machine tag. Exactly one value at any time.
///
/// "Is the actor advancing between tiles" is always `status == Moving`; there
/// is no separate flag that could disagree with it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MovementStatus {
    #[default]
    Idle,
    TurningInPlace,
    Moving,
}

impl MovementStatus {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl core::fmt::Display for MovementStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
