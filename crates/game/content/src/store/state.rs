/// Configuration store lifecycle.
///
/// ```text
/// Uninitialized -> Loading -> Ready -> ShuttingDown -> Uninitialized
///                     |                     ^
///                     +---------------------+
/// ```
///
/// Reloading a single entry happens within `Ready` and is not a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StoreState {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    ShuttingDown,
}

impl StoreState {
    /// Whether the store may move from `self` to `next`.
    pub fn can_transition_to(self, next: StoreState) -> bool {
        matches!(
            (self, next),
            (Self::Uninitialized, Self::Loading)
                | (Self::Loading, Self::Ready)
                | (Self::Loading, Self::ShuttingDown)
                | (Self::Ready, Self::ShuttingDown)
                | (Self::ShuttingDown, Self::Uninitialized)
        )
    }

    /// Lookups are only served in `Ready`.
    pub fn serves_queries(self) -> bool {
        self == Self::Ready
    }
}
