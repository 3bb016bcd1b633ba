use folio_core::Direction;
use folio_core::models::{AboutParagraph, HeroStat};

/// An element of a list that is saved as one array.
pub trait Slot: Clone {
    /// Called with the element's index after every structural change.
    fn set_position(&mut self, _position: u32) {}
}

impl Slot for AboutParagraph {
    fn set_position(&mut self, position: u32) {
        self.order = position;
    }
}

/// Stats are positional; their index is their order.
impl Slot for HeroStat {}

/// Local editing buffer for a list persisted by one atomic replacement
/// (about paragraphs, hero stats). Nothing here talks to a store; every
/// operation is synchronous and bounds-checked against the list's
/// cardinality limits.
#[derive(Debug, Clone)]
pub struct BatchEditor<T> {
    items: Vec<T>,
    min: usize,
    max: Option<usize>,
    dirty: bool,
}

impl<T: Slot> BatchEditor<T> {
    pub fn new(min: usize, max: Option<usize>) -> Self {
        Self {
            items: Vec::new(),
            min,
            max,
            dirty: false,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Unsaved local changes exist.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_full(&self) -> bool {
        self.max.is_some_and(|max| self.items.len() >= max)
    }

    /// Replaces the buffer with confirmed state and clears the dirty flag.
    pub fn reset(&mut self, items: Vec<T>) {
        self.items = items;
        self.renumber();
        self.dirty = false;
    }

    /// Appends unless the list is at its cap.
    pub fn add(&mut self, item: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(item);
        self.touch();
        true
    }

    /// Removes the element at `index` unless that would go below the minimum.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.items.len() || self.items.len() <= self.min {
            return false;
        }
        self.items.remove(index);
        self.touch();
        true
    }

    pub fn edit(&mut self, index: usize, f: impl FnOnce(&mut T)) -> bool {
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        f(item);
        self.dirty = true;
        true
    }

    /// Swaps with the neighbour; no-op at either boundary.
    pub fn move_item(&mut self, index: usize, direction: Direction) -> bool {
        let neighbour = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => index.checked_add(1),
        };
        match neighbour {
            Some(n) if index < self.items.len() && n < self.items.len() => {
                self.items.swap(index, n);
                self.touch();
                true
            }
            _ => false,
        }
    }

    fn touch(&mut self) {
        self.renumber();
        self.dirty = true;
    }

    fn renumber(&mut self) {
        for (i, item) in self.items.iter_mut().enumerate() {
            item.set_position(i as u32);
        }
    }
}
