use super::*;

fn line(id: &str, price: u64, qty: u32) -> CartLine {
    CartLine {
        product_id: id.to_owned(),
        name: format!("product {id}"),
        unit_price_cents: price,
        quantity: qty,
    }
}

#[test]
fn add_merges_lines_and_tracks_subtotal() {
    let mut cart = Cart::default();
    cart.add(line("a", 1000, 1));
    cart.add(line("b", 250, 4));
    cart.add(line("a", 1000, 2));
    cart.add(line("c", 99, 0));

    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.lines()[0].quantity, 3);
    assert_eq!(cart.item_count(), 7);
    assert_eq!(cart.subtotal_cents(), 4000);
}

#[test]
fn zero_quantity_removes_line() {
    let mut cart = Cart::default();
    cart.add(line("a", 500, 2));
    assert!(cart.set_quantity("a", 5));
    assert_eq!(cart.subtotal_cents(), 2500);
    assert!(cart.set_quantity("a", 0));
    assert!(cart.is_empty());
    assert!(!cart.remove("a"));
    assert!(!cart.set_quantity("missing", 3));
}

#[test]
fn every_mutation_is_persisted_under_cart_key() {
    let store = MemoryKvStore::new();
    let mut cart = PersistentCart::open(store.clone()).unwrap();
    assert!(cart.cart().is_empty());
    assert_eq!(store.get(CART_STORAGE_KEY).unwrap(), None);

    cart.add(line("a", 300, 1)).unwrap();
    let raw = store.get(CART_STORAGE_KEY).unwrap().unwrap();
    let stored: Cart = serde_json::from_str(&raw).unwrap();
    assert_eq!(&stored, cart.cart());

    cart.set_quantity("a", 3).unwrap();
    let stored: Cart = serde_json::from_str(&store.get(CART_STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.subtotal_cents(), 900);

    cart.clear().unwrap();
    assert_eq!(store.get(CART_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn reopen_restores_previous_cart() {
    let store = MemoryKvStore::new();
    {
        let mut cart = PersistentCart::open(store.clone()).unwrap();
        cart.add(line("a", 120, 2)).unwrap();
        cart.add(line("b", 80, 1)).unwrap();
    }
    let cart = PersistentCart::open(store).unwrap();
    assert_eq!(cart.cart().lines().len(), 2);
    assert_eq!(cart.subtotal_cents(), 320);
}

#[test]
fn corrupt_cart_loads_empty() {
    let mut store = MemoryKvStore::new();
    store.set(CART_STORAGE_KEY, "{not json".to_owned()).unwrap();
    let cart = PersistentCart::open(store).unwrap();
    assert!(cart.cart().is_empty());
}

#[test]
fn file_store_survives_reopen() {
    let dir = std::env::temp_dir().join(format!("framescrub_kv_{}", std::process::id()));
    let path = dir.join("nested").join("storage.json");
    std::fs::remove_dir_all(&dir).ok();

    let store = FileKvStore::open(&path).unwrap();
    assert_eq!(store.path(), path.as_path());
    let mut cart = PersistentCart::open(store).unwrap();
    cart.add(line("z", 4200, 1)).unwrap();
    drop(cart);

    let mut reopened = FileKvStore::open(&path).unwrap();
    assert!(reopened.get(CART_STORAGE_KEY).unwrap().is_some());
    let cart = PersistentCart::open(reopened.clone()).unwrap();
    assert_eq!(cart.subtotal_cents(), 4200);

    reopened.remove(CART_STORAGE_KEY).unwrap();
    let again = FileKvStore::open(&path).unwrap();
    assert_eq!(again.get(CART_STORAGE_KEY).unwrap(), None);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn malformed_store_file_is_an_error() {
    let dir = std::env::temp_dir().join(format!("framescrub_kv_bad_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("storage.json");
    std::fs::write(&path, b"[1,2").unwrap();
    assert!(matches!(FileKvStore::open(&path), Err(ScrubError::Serde(_))));
    std::fs::remove_dir_all(&dir).ok();
}
