pub mod render;
pub mod session;
pub mod state;
pub mod view;

pub use render::{render_html, render_text};
pub use session::{Session, UploadDisposition};
pub use state::{SessionEvent, UploadTicket, ViewState};
pub use view::{ResultView, ScoreGauge, Screen, ScreenBody};
