//! In-memory event store backed by a ring buffer
//!
//! Slots are written round-robin; once every slot is occupied the next save
//! overwrites the oldest event. A `HashMap` from id to slot gives O(1)
//! lookups. Buffer, index, cursor and length live behind one `RwLock` so the
//! index can never disagree with the buffer.

use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use super::store::{EventStore, StoreError, StoreResult};
use crate::types::{EventRecord, EventStatus};

/// Default number of events retained when no capacity is configured
pub const DEFAULT_CAPACITY: usize = 1000;

/// Ring buffer state, always mutated as a unit
#[derive(Debug)]
struct Ring {
    slots: Vec<Option<EventRecord>>,
    /// Event id -> slot position
    index: HashMap<Uuid, usize>,
    /// Next slot to write
    head: usize,
    /// Occupied slots
    len: usize,
}

impl Ring {
    fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            index: HashMap::with_capacity(capacity),
            head: 0,
            len: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot of the i-th most recent event (0 = newest)
    fn newest_slot(&self, i: usize) -> usize {
        let capacity = self.capacity();
        (self.head + capacity - 1 - i) % capacity
    }

    fn push(&mut self, event: EventRecord) -> StoreResult<()> {
        if self.index.contains_key(&event.id) {
            return Err(StoreError::DuplicateId(event.id));
        }

        let slot = self.head;
        if let Some(evicted) = self.slots[slot].take() {
            // Only drop the mapping if it still points here.
            if self.index.get(&evicted.id) == Some(&slot) {
                self.index.remove(&evicted.id);
            }
        }

        self.index.insert(event.id, slot);
        self.slots[slot] = Some(event);
        self.head = (slot + 1) % self.capacity();
        if self.len < self.capacity() {
            self.len += 1;
        }
        Ok(())
    }

    fn slot_mut(&mut self, id: &Uuid) -> Option<&mut EventRecord> {
        let slot = *self.index.get(id)?;
        self.slots[slot].as_mut()
    }

    fn slot(&self, id: &Uuid) -> Option<&EventRecord> {
        let slot = *self.index.get(id)?;
        self.slots[slot].as_ref()
    }

    fn newest(&self, limit: usize, offset: usize) -> Vec<EventRecord> {
        if limit == 0 || offset >= self.len {
            return Vec::new();
        }

        let take = limit.min(self.len - offset);
        let mut events = Vec::with_capacity(take);
        for i in offset..offset + take {
            if let Some(event) = &self.slots[self.newest_slot(i)] {
                events.push(event.clone());
            }
        }
        events
    }
}

/// Fixed-capacity event store safe for concurrent readers and writers
#[derive(Debug)]
pub struct MemoryStore {
    ring: RwLock<Ring>,
    capacity: usize,
}

impl MemoryStore {
    /// Create a store holding at most `capacity` events
    pub fn new(capacity: usize) -> StoreResult<Self> {
        if capacity == 0 {
            return Err(StoreError::InvalidCapacity);
        }
        Ok(Self {
            ring: RwLock::new(Ring::with_capacity(capacity)),
            capacity,
        })
    }

    /// Create a store from a signed capacity, as read from configuration
    pub fn from_signed(capacity: i64) -> StoreResult<Self> {
        let capacity = usize::try_from(capacity).map_err(|_| StoreError::InvalidCapacity)?;
        Self::new(capacity)
    }

    /// Verify that every indexed id points at a slot holding that id.
    ///
    /// Used by tests to check structural consistency under load.
    #[doc(hidden)]
    pub fn is_consistent(&self) -> bool {
        let ring = self.ring.read();
        let occupied = ring.slots.iter().filter(|slot| slot.is_some()).count();
        occupied == ring.len
            && ring.index.len() == ring.len
            && ring.index.iter().all(|(id, &slot)| {
                ring.slots[slot]
                    .as_ref()
                    .map(|event| event.id == *id)
                    .unwrap_or(false)
            })
    }
}

impl EventStore for MemoryStore {
    fn save(&self, event: EventRecord) -> StoreResult<()> {
        self.ring.write().push(event)
    }

    fn get(&self, id: &Uuid) -> StoreResult<EventRecord> {
        self.ring
            .read()
            .slot(id)
            .cloned()
            .ok_or(StoreError::NotFound(*id))
    }

    fn list(&self, limit: usize, offset: usize) -> Vec<EventRecord> {
        self.ring.read().newest(limit, offset)
    }

    fn page(&self, limit: usize, offset: usize) -> (Vec<EventRecord>, usize) {
        let ring = self.ring.read();
        (ring.newest(limit, offset), ring.len)
    }

    fn update_status(&self, id: &Uuid, status: EventStatus) -> StoreResult<EventRecord> {
        let mut ring = self.ring.write();
        let event = ring.slot_mut(id).ok_or(StoreError::NotFound(*id))?;
        event.status = status;
        Ok(event.clone())
    }

    fn count(&self) -> usize {
        self.ring.read().len
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn make_event(channel: &str) -> EventRecord {
        let mut headers = BTreeMap::new();
        headers.insert("x-test".to_string(), "1".to_string());
        EventRecord::new(channel, br#"{"test":true}"#.to_vec(), headers)
    }

    fn ids(events: &[EventRecord]) -> Vec<Uuid> {
        events.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_new_rejects_zero_capacity() {
        assert_eq!(MemoryStore::new(0).unwrap_err(), StoreError::InvalidCapacity);
        for capacity in [0, -1, -100] {
            assert_eq!(
                MemoryStore::from_signed(capacity).unwrap_err(),
                StoreError::InvalidCapacity
            );
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = MemoryStore::from_signed(5).unwrap();
        assert_eq!(store.count(), 0);
        assert_eq!(store.capacity(), 5);
        assert!(store.list(10, 0).is_empty());
    }

    #[test]
    fn test_save_and_get() {
        let store = MemoryStore::new(10).unwrap();
        let event = make_event("slack");
        store.save(event.clone()).unwrap();

        let got = store.get(&event.id).unwrap();
        assert_eq!(got, event);
    }

    #[test]
    fn test_get_not_found() {
        let store = MemoryStore::new(10).unwrap();
        let id = Uuid::new_v4();
        assert_eq!(store.get(&id).unwrap_err(), StoreError::NotFound(id));
    }

    #[test]
    fn test_eviction_at_capacity() {
        let store = MemoryStore::new(3).unwrap();
        let events: Vec<_> = (0..5).map(|_| make_event("ch")).collect();
        for event in &events {
            store.save(event.clone()).unwrap();
        }

        assert_eq!(store.count(), 3);
        for event in &events[..2] {
            assert_eq!(store.get(&event.id), Err(StoreError::NotFound(event.id)));
        }
        for event in &events[2..] {
            assert_eq!(store.get(&event.id).unwrap().id, event.id);
        }
        assert!(store.is_consistent());
    }

    #[test]
    fn test_list_newest_first() {
        let store = MemoryStore::new(10).unwrap();
        let events: Vec<_> = (0..5).map(|_| make_event("ch")).collect();
        for event in &events {
            store.save(event.clone()).unwrap();
        }

        let listed = store.list(10, 0);
        let expected: Vec<_> = events.iter().rev().map(|e| e.id).collect();
        assert_eq!(ids(&listed), expected);
    }

    #[test]
    fn test_list_pagination() {
        let store = MemoryStore::new(10).unwrap();
        let events: Vec<_> = (0..5).map(|_| make_event("ch")).collect();
        for event in &events {
            store.save(event.clone()).unwrap();
        }

        assert_eq!(ids(&store.list(2, 0)), vec![events[4].id, events[3].id]);
        assert_eq!(ids(&store.list(2, 2)), vec![events[2].id, events[1].id]);
        assert_eq!(ids(&store.list(2, 4)), vec![events[0].id]);
        assert!(store.list(2, 5).is_empty());
        assert!(store.list(2, 10).is_empty());
        assert!(store.list(0, 0).is_empty());
    }

    #[test]
    fn test_list_with_eviction() {
        let store = MemoryStore::new(3).unwrap();
        let events: Vec<_> = (0..5).map(|_| make_event("ch")).collect();
        for event in &events {
            store.save(event.clone()).unwrap();
        }

        assert_eq!(
            ids(&store.list(10, 0)),
            vec![events[4].id, events[3].id, events[2].id]
        );
        assert_eq!(ids(&store.list(2, 1)), vec![events[3].id, events[2].id]);
    }

    #[test]
    fn test_update_status() {
        let store = MemoryStore::new(10).unwrap();
        let event = make_event("slack");
        store.save(event.clone()).unwrap();

        let updated = store.update_status(&event.id, EventStatus::Completed).unwrap();

        let got = store.get(&event.id).unwrap();
        assert_eq!(got.status, EventStatus::Completed);
        assert_eq!(updated, got);
        assert_eq!(
            EventRecord {
                status: EventStatus::Received,
                ..got
            },
            event
        );
    }

    #[test]
    fn test_page_total_matches_snapshot() {
        let store = MemoryStore::new(3).unwrap();
        assert_eq!(store.page(10, 0), (Vec::new(), 0));

        let events: Vec<EventRecord> = (0..5).map(|_| make_event("ch")).collect();
        for e in &events {
            store.save(e.clone()).unwrap();
        }

        let (page, total) = store.page(2, 1);
        assert_eq!(total, 3);
        assert_eq!(ids(&page), vec![events[3].id, events[2].id]);
        assert_eq!(page, store.list(2, 1));
    }

    #[test]
    fn test_update_status_not_found() {
        let store = MemoryStore::new(10).unwrap();
        let id = Uuid::new_v4();
        assert_eq!(
            store.update_status(&id, EventStatus::Failed),
            Err(StoreError::NotFound(id))
        );
    }

    #[test]
    fn test_update_status_does_not_extend_retention() {
        let store = MemoryStore::new(2).unwrap();
        let first = make_event("ch");
        store.save(first.clone()).unwrap();
        store.save(make_event("ch")).unwrap();

        store.update_status(&first.id, EventStatus::Forwarded).unwrap();
        store.save(make_event("ch")).unwrap();

        assert_eq!(store.get(&first.id), Err(StoreError::NotFound(first.id)));
    }

    #[test]
    fn test_count() {
        let store = MemoryStore::new(5).unwrap();
        assert_eq!(store.count(), 0);

        for _ in 0..3 {
            store.save(make_event("ch")).unwrap();
        }
        assert_eq!(store.count(), 3);

        for _ in 0..5 {
            store.save(make_event("ch")).unwrap();
        }
        assert_eq!(store.count(), 5);
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let store = MemoryStore::new(3).unwrap();
        let event = make_event("ch");
        store.save(event.clone()).unwrap();

        let mut twin = make_event("other");
        twin.id = event.id;
        assert_eq!(store.save(twin), Err(StoreError::DuplicateId(event.id)));

        assert_eq!(store.count(), 1);
        assert_eq!(store.get(&event.id).unwrap().channel_id, "ch");
    }

    #[test]
    fn test_id_can_be_reused_after_eviction() {
        let store = MemoryStore::new(1).unwrap();
        let event = make_event("ch");
        store.save(event.clone()).unwrap();
        store.save(make_event("ch")).unwrap();

        store.save(event.clone()).unwrap();
        assert_eq!(store.get(&event.id).unwrap(), event);
        assert!(store.is_consistent());
    }

    #[test]
    fn test_capacity_one_keeps_latest() {
        let store = MemoryStore::new(1).unwrap();
        let a = make_event("ch");
        let b = make_event("ch");
        store.save(a.clone()).unwrap();
        store.save(b.clone()).unwrap();

        assert_eq!(store.count(), 1);
        assert_eq!(ids(&store.list(5, 0)), vec![b.id]);
        assert!(store.get(&a.id).is_err());
    }

    /// capacity 3; save A..E; then page and update
    #[test]
    fn test_walkthrough_scenario() {
        let store = MemoryStore::new(3).unwrap();
        let [a, b, c, d, e] = std::array::from_fn(|_| make_event("ch"));
        for event in [&a, &b, &c, &d, &e] {
            store.save(event.clone()).unwrap();
        }

        assert_eq!(store.count(), 3);
        assert!(store.get(&a.id).is_err());
        assert!(store.get(&b.id).is_err());
        assert_eq!(ids(&store.list(10, 0)), vec![e.id, d.id, c.id]);
        assert_eq!(ids(&store.list(2, 1)), vec![d.id, c.id]);

        store.update_status(&c.id, EventStatus::Completed).unwrap();
        assert_eq!(store.get(&c.id).unwrap().status, EventStatus::Completed);
    }
}
