//! The basic leaf piece: an image, a name, a position.

use tessera_codec::{unwrap_null, SequenceReader, SequenceWriter};

use crate::{
    registry::strip_prefix, Bounds, GamePiece, KeyStroke, PieceId, Point,
    Shape,
};

/// Default footprint for a token whose image metrics are unknown here
/// (the renderer owns real image sizes).
const DEFAULT_SIDE: i32 = 48;

/// The standard leaf entity at the root of every ordinary chain.
///
/// Type segment: `piece;<image>;<display name>`. State:
/// `<surface|null>;<x>;<y>` — which surface the token sits on and
/// where. Surface ids are opaque references to boards owned elsewhere.
#[derive(Debug, Default)]
pub struct BasicPiece {
    id: Option<PieceId>,
    image: String,
    display_name: String,
    surface: Option<String>,
    position: Point,
    parent: Option<PieceId>,
}

impl BasicPiece {
    /// Registry prefix for this kind.
    pub const PREFIX: &'static str = "piece;";

    /// Creates a leaf with the given image reference and display name.
    pub fn new(image: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            display_name: name.into(),
            ..Self::default()
        }
    }

    /// A blank token: no image, no name, still a fully functional
    /// leaf. Editors use it as the starting point for a new piece.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Rebuilds a leaf from its type segment. Tolerant of short
    /// segments: missing fields read as empty.
    pub fn from_type(piece_type: &str) -> Self {
        let mut reader =
            SequenceReader::new(strip_prefix(piece_type, Self::PREFIX), ';');
        let image = reader.next_or("");
        let display_name = reader.next_or("");
        Self::new(image, display_name)
    }

    /// The image reference this token draws with.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// The surface this token currently sits on, if placed.
    pub fn surface(&self) -> Option<&str> {
        self.surface.as_deref()
    }

    /// Places the token on a surface (or off-board with `None`).
    pub fn set_surface(&mut self, surface: Option<String>) {
        self.surface = surface;
    }
}

impl GamePiece for BasicPiece {
    fn id(&self) -> Option<&PieceId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: PieceId) {
        if let Some(existing) = &self.id {
            tracing::debug!(%existing, attempted = %id, "piece id is already assigned, ignoring");
            return;
        }
        self.id = Some(id);
    }

    fn piece_type(&self) -> String {
        SequenceWriter::new(';')
            .append("piece")
            .append(&self.image)
            .append(&self.display_name)
            .finish()
    }

    fn state(&self) -> String {
        SequenceWriter::new(';')
            .append_opt(self.surface.as_deref())
            .append_int(self.position.x)
            .append_int(self.position.y)
            .finish()
    }

    fn set_state(&mut self, state: &str) {
        let mut reader = SequenceReader::new(state, ';');
        self.surface =
            unwrap_null(&reader.next_or("null")).map(str::to_owned);
        match (reader.next_int(), reader.next_int()) {
            (Ok(x), Ok(y)) => self.position = Point::new(x, y),
            _ => {
                tracing::warn!(state, "unreadable position in piece state, keeping current");
            }
        }
    }

    fn name(&self) -> String {
        self.display_name.clone()
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, pos: Point) {
        self.position = pos;
    }

    fn bounding_box(&self) -> Bounds {
        Bounds::centered_square(DEFAULT_SIDE)
    }

    fn shape(&self) -> Shape {
        Shape::Rect(self.bounding_box())
    }

    fn parent(&self) -> Option<&PieceId> {
        self.parent.as_ref()
    }

    fn set_parent(&mut self, parent: Option<PieceId>) {
        self.parent = parent;
    }

    fn handle_key(&mut self, _stroke: KeyStroke) -> bool {
        false
    }

    fn property(&self, key: &str) -> Option<String> {
        match key {
            "PieceName" => Some(self.display_name.clone()),
            _ => None,
        }
    }
}
