#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Initial request to load the gallery.
    LoadRequested,
    /// User asked to retry after a failure.
    RetryClicked,
    /// The feed arrived; probing starts next.
    FeedFetched { username: String, candidates: usize },
    /// One probe settled.
    ProbeSettled { index: usize, verified: bool },
    /// Every probe settled; `verified` is in feed order.
    ProbesFinished { verified: Vec<String> },
    /// The feed could not be fetched.
    LoadFailed(String),
    /// User clicked a gallery tile.
    TileClicked(usize),
    /// User closed the lightbox.
    LightboxClosed,
    KeyPressed(Key),
    NextClicked,
    PrevClicked,
    /// User clicked the slide indicator at this index.
    IndicatorClicked(usize),
    /// Horizontal and vertical travel of a touch gesture, measured start minus end.
    Swiped { dx: f32, dy: f32 },
    PointerEntered,
    PointerLeft,
    AutoplayTick,
    AnimationFinished,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
