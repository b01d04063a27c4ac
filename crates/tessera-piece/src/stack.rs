//! The stack leaf: a group container for other pieces.
//!
//! A stack *references* its members by id; it never owns them. Members
//! point back through their parent link. Stacking order and movement
//! rules are game policy decided elsewhere — the engine only keeps the
//! membership list replayable.

use tessera_codec::{join, split, unwrap_null, SequenceReader, SequenceWriter};

use crate::{Bounds, GamePiece, KeyStroke, PieceId, Point, Shape};

/// A group of pieces sharing one board location.
///
/// Type string: the bare token `stack` — no `;`, which makes it the
/// kind that exercises the whole-string prefix rule. State:
/// `<surface|null>;<x>;<y>;<member,ids>`.
#[derive(Debug, Default)]
pub struct StackPiece {
    id: Option<PieceId>,
    surface: Option<String>,
    position: Point,
    members: Vec<PieceId>,
    parent: Option<PieceId>,
}

impl StackPiece {
    /// Registry prefix for this kind — the entire type string, because
    /// it carries no `;`-terminated configuration.
    pub const PREFIX: &'static str = "stack";

    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Member ids, bottom-most first.
    pub fn members(&self) -> &[PieceId] {
        &self.members
    }

    /// Appends a member on top.
    pub fn push_member(&mut self, id: PieceId) {
        if !self.members.contains(&id) {
            self.members.push(id);
        }
    }

    /// Removes a member, if present.
    pub fn remove_member(&mut self, id: &PieceId) {
        self.members.retain(|m| m != id);
    }

    /// Places the stack on a surface (or off-board with `None`).
    pub fn set_surface(&mut self, surface: Option<String>) {
        self.surface = surface;
    }
}

impl GamePiece for StackPiece {
    fn id(&self) -> Option<&PieceId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: PieceId) {
        if let Some(existing) = &self.id {
            tracing::debug!(%existing, attempted = %id, "stack id is already assigned, ignoring");
            return;
        }
        self.id = Some(id);
    }

    fn piece_type(&self) -> String {
        Self::PREFIX.to_owned()
    }

    fn state(&self) -> String {
        let members: Vec<&str> =
            self.members.iter().map(PieceId::as_str).collect();
        SequenceWriter::new(';')
            .append_opt(self.surface.as_deref())
            .append_int(self.position.x)
            .append_int(self.position.y)
            .append(&join(&members, ','))
            .finish()
    }

    fn set_state(&mut self, state: &str) {
        let mut reader = SequenceReader::new(state, ';');
        self.surface =
            unwrap_null(&reader.next_or("null")).map(str::to_owned);
        match (reader.next_int(), reader.next_int()) {
            (Ok(x), Ok(y)) => self.position = Point::new(x, y),
            _ => {
                tracing::warn!(state, "unreadable position in stack state, keeping current");
            }
        }
        let members = reader.next_or("");
        self.members = if members.is_empty() {
            Vec::new()
        } else {
            split(&members, ',').into_iter().map(PieceId::from).collect()
        };
    }

    fn name(&self) -> String {
        format!("Stack ({})", self.members.len())
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, pos: Point) {
        self.position = pos;
    }

    fn bounding_box(&self) -> Bounds {
        Bounds::centered_square(48)
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

    fn property(&self, _key: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_is_the_bare_token() {
        assert_eq!(StackPiece::new().piece_type(), "stack");
    }

    #[test]
    fn test_state_round_trips_members() {
        let mut stack = StackPiece::new();
        stack.set_surface(Some("board".to_owned()));
        stack.set_position(Point::new(5, 6));
        stack.push_member(PieceId::new("p1"));
        stack.push_member(PieceId::new("p2"));

        let state = stack.state();
        assert_eq!(state, "board;5;6;p1,p2");

        let mut other = StackPiece::new();
        other.set_state(&state);
        assert_eq!(other.members(), &[PieceId::new("p1"), PieceId::new("p2")]);
        assert_eq!(other.position(), Point::new(5, 6));
    }

    #[test]
    fn test_empty_stack_state_round_trips() {
        let stack = StackPiece::new();
        let mut other = StackPiece::new();
        other.push_member(PieceId::new("stale"));
        other.set_state(&stack.state());
        assert!(other.members().is_empty());
    }

    #[test]
    fn test_push_member_deduplicates() {
        let mut stack = StackPiece::new();
        stack.push_member(PieceId::new("p1"));
        stack.push_member(PieceId::new("p1"));
        assert_eq!(stack.members().len(), 1);
    }

    #[test]
    fn test_remove_member() {
        let mut stack = StackPiece::new();
        stack.push_member(PieceId::new("p1"));
        stack.push_member(PieceId::new("p2"));
        stack.remove_member(&PieceId::new("p1"));
        assert_eq!(stack.members(), &[PieceId::new("p2")]);
    }
}
