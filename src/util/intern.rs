use std::{collections::HashMap, fmt, num::NonZeroU32, rc::Rc};

/// A handle to an interned identifier. To retrieve the `&str`, use
/// [`Interner::get`].
///
/// Two handles from the same interner are equal iff the strings are equal.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interned(
    // Here we use a NonZeroU32 to leverage niche layout optimization.
    NonZeroU32,
);

impl fmt::Debug for Interned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interned({})", self.0)
    }
}

/// Identifier interner. Names are stored once and handed out as
/// [`Interned`] handles, which are cheap to copy, hash and compare.
pub struct Interner {
    map: HashMap<Rc<str>, Interned>,
    vec: Vec<Rc<str>>,
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.vec.iter().enumerate().map(|(i, name)| (i + 1, name)))
            .finish()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Interner::with_capacity(0)
    }
}

impl Interner {
    pub fn with_capacity(capacity: usize) -> Self {
        Interner {
            map: HashMap::with_capacity(capacity),
            vec: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.vec.clear();
    }

    /// Interns the provided name, returning a handle which can be used to
    /// retrieve it later.
    pub fn intern(&mut self, name: &str) -> Interned {
        if let Some(handle) = self.map.get(name) {
            return *handle;
        }
        let next = u32::try_from(self.vec.len() + 1)
            .ok()
            .and_then(NonZeroU32::new)
            .unwrap_or_else(|| panic!("interner out of capacity"));
        let handle = Interned(next);
        let key: Rc<str> = Rc::from(name);
        self.vec.push(Rc::clone(&key));
        self.map.insert(key, handle);
        handle
    }

    /// Returns the corresponding name for the provided handle.
    /// Panics if the handle comes from another interner.
    pub fn get(&self, handle: impl Into<Interned>) -> &str {
        let Interned(index) = handle.into();
        &self.vec[index.get() as usize - 1]
    }
}

impl From<&Interned> for Interned {
    fn from(value: &Interned) -> Self {
        *value
    }
}
