//! Gallery core: pure state machines for the gallery, lightbox and carousel.
mod carousel;
mod effect;
mod msg;
mod selection;
mod state;
mod update;
mod view_model;

pub use carousel::{Autoplay, Carousel, CarouselPhase, CarouselSettings, SlideRole};
pub use effect::Effect;
pub use msg::{Key, Msg};
pub use selection::{select_for_display, DisplaySelection, DEFAULT_MAX_DISPLAY};
pub use state::{AppState, CoreSettings, GalleryPhase, Notice};
pub use update::update;
pub use view_model::{AppViewModel, CarouselView, GalleryView, LightboxView, TileView};
