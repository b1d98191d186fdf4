use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use anyhow::Context;

use crate::foundation::error::{ScrubError, ScrubResult};

/// Storage key the cart document lives under.
pub const CART_STORAGE_KEY: &str = "cart";

/// String key-value persistence, shaped like browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> ScrubResult<Option<String>>;
    fn set(&mut self, key: &str, value: String) -> ScrubResult<()>;
    fn remove(&mut self, key: &str) -> ScrubResult<()>;
}

/// In-process store. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryKvStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> ScrubResult<Option<String>> {
        Ok(self.map().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> ScrubResult<()> {
        self.map().insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> ScrubResult<()> {
        self.map().remove(key);
        Ok(())
    }
}

/// All keys in one JSON object on disk, rewritten whole on every change.
#[derive(Clone, Debug)]
pub struct FileKvStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileKvStore {
    /// Open `path`, starting empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> ScrubResult<Self> {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("read store '{}'", path.display()))
                    .into());
            }
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> ScrubResult<()> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create store dir '{}'", dir.display()))?;
        }
        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        std::fs::write(&self.path, bytes)
            .with_context(|| format!("write store '{}'", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> ScrubResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> ScrubResult<()> {
        self.entries.insert(key.to_owned(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> ScrubResult<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: u64,
    pub quantity: u32,
}

impl CartLine {
    pub fn total_cents(&self) -> u64 {
        self.unit_price_cents.saturating_mul(u64::from(self.quantity))
    }
}

/// Cart contents, one line per product, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn subtotal_cents(&self) -> u64 {
        self.lines
            .iter()
            .fold(0u64, |acc, l| acc.saturating_add(l.total_cents()))
    }

    /// Add `line.quantity` of a product, merging into an existing line for the same id.
    pub fn add(&mut self, line: CartLine) {
        if line.quantity == 0 {
            return;
        }
        match self.lines.iter_mut().find(|l| l.product_id == line.product_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
                existing.name = line.name;
                existing.unit_price_cents = line.unit_price_cents;
            }
            None => self.lines.push(line),
        }
    }

    /// Returns false when the product is not in the cart. Zero removes the line.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> bool {
        let Some(pos) = self.lines.iter().position(|l| l.product_id == product_id) else {
            return false;
        };
        if quantity == 0 {
            self.lines.remove(pos);
        } else {
            self.lines[pos].quantity = quantity;
        }
        true
    }

    pub fn remove(&mut self, product_id: &str) -> bool {
        self.set_quantity(product_id, 0)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// A cart mirrored into a [`KeyValueStore`]: read once on open, written after every mutation.
#[derive(Debug)]
pub struct PersistentCart<K: KeyValueStore> {
    store: K,
    cart: Cart,
}

impl<K: KeyValueStore> PersistentCart<K> {
    #[tracing::instrument(skip_all)]
    pub fn open(store: K) -> ScrubResult<Self> {
        let cart = match store.get(CART_STORAGE_KEY)? {
            None => Cart::default(),
            Some(raw) => match serde_json::from_str::<Cart>(&raw) {
                Ok(cart) => cart,
                Err(e) => {
                    tracing::warn!(error = %e, "stored cart unreadable, starting empty");
                    Cart::default()
                }
            },
        };
        tracing::debug!(lines = cart.lines().len(), "cart loaded");
        Ok(Self { store, cart })
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn into_store(self) -> K {
        self.store
    }

    pub fn add(&mut self, line: CartLine) -> ScrubResult<()> {
        self.cart.add(line);
        self.persist()
    }

    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> ScrubResult<bool> {
        let found = self.cart.set_quantity(product_id, quantity);
        if found {
            self.persist()?;
        }
        Ok(found)
    }

    pub fn remove(&mut self, product_id: &str) -> ScrubResult<bool> {
        self.set_quantity(product_id, 0)
    }

    pub fn clear(&mut self) -> ScrubResult<()> {
        self.cart.clear();
        self.persist()
    }

    pub fn subtotal_cents(&self) -> u64 {
        self.cart.subtotal_cents()
    }

    fn persist(&mut self) -> ScrubResult<()> {
        let raw = serde_json::to_string(&self.cart)
            .map_err(|e| ScrubError::serde(format!("encode cart: {e}")))?;
        self.store.set(CART_STORAGE_KEY, raw)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shop/cart.rs"]
mod tests;
