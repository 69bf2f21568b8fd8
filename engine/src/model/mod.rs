//! Concrete entity types.

mod cart;
mod note;
mod todo;

pub use cart::{CartItem, CartItemDraft, CartItemPatch};
pub use note::{Note, NoteDraft, NotePatch};
pub use todo::{Todo, TodoDraft, TodoPatch};
