//! The VID⇄RID translation engine over the persistent store.
//!
//! Bindings live in the shared `VIDTORID`/`RIDTOVID` hashes so they survive
//! daemon restarts; the two hashes are kept mutual inverses for every
//! non-null binding. A virtual id with no binding is a protocol violation
//! and surfaces as an error the dispatcher treats as fatal. A real id with
//! no binding is normal (the SDK hands out default objects) and mints a
//! fresh virtual id on first sight.

use sai_bus::{store, Bus, BusError};
use sai_types::{ObjectId, ObjectType};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("no real id bound for virtual id {0}")]
    MissingVid(ObjectId),

    #[error("sdk reports no object type for real id {0}")]
    UnknownRidType(ObjectId),

    #[error("corrupt translation entry: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Bus(#[from] BusError),
}

pub struct IdTranslator {
    bus: Arc<dyn Bus>,
}

impl IdTranslator {
    pub fn new(bus: Arc<dyn Bus>) -> Self {
        IdTranslator { bus }
    }

    /// Resolves a virtual id to its bound real id. Null maps to null;
    /// anything else unbound is the caller's fatal problem.
    pub fn vid_to_rid(&self, vid: ObjectId) -> Result<ObjectId, TranslateError> {
        if vid.is_null() {
            return Ok(ObjectId::NULL);
        }
        let text = self
            .bus
            .hget(store::VID_TO_RID, &vid.to_string())?
            .ok_or(TranslateError::MissingVid(vid))?;
        let rid: ObjectId = text
            .parse()
            .map_err(|_| TranslateError::Corrupt(text.clone()))?;
        debug!(%vid, %rid, "translated virtual id to real id");
        Ok(rid)
    }

    /// Resolves a real id to a virtual id, minting and binding a fresh one
    /// for never-seen real ids. `object_type_of` is consulted only on a
    /// miss, to stamp the new virtual id with the right kind.
    pub fn rid_to_vid(
        &self,
        rid: ObjectId,
        object_type_of: impl FnOnce(ObjectId) -> ObjectType,
    ) -> Result<ObjectId, TranslateError> {
        if rid.is_null() {
            return Ok(ObjectId::NULL);
        }
        if let Some(text) = self.bus.hget(store::RID_TO_VID, &rid.to_string())? {
            let vid: ObjectId = text
                .parse()
                .map_err(|_| TranslateError::Corrupt(text.clone()))?;
            debug!(%rid, %vid, "translated real id to virtual id");
            return Ok(vid);
        }

        info!(%rid, "spotted new real id");
        let kind = object_type_of(rid);
        if kind == ObjectType::Null {
            return Err(TranslateError::UnknownRidType(rid));
        }
        let vid = self.allocate_vid(kind)?;
        self.bind(vid, rid)?;
        Ok(vid)
    }

    /// Draws a fresh virtual id for `kind` from the shared counter.
    pub fn allocate_vid(&self, kind: ObjectType) -> Result<ObjectId, TranslateError> {
        let counter = self.bus.incr(store::VID_COUNTER)?;
        let vid = ObjectId::pack(kind, counter);
        debug!(%vid, %kind, "created virtual object id");
        Ok(vid)
    }

    /// Records both directions of a binding.
    pub fn bind(&self, vid: ObjectId, rid: ObjectId) -> Result<(), TranslateError> {
        let (vid_text, rid_text) = (vid.to_string(), rid.to_string());
        self.bus.hset(store::VID_TO_RID, &vid_text, &rid_text)?;
        self.bus.hset(store::RID_TO_VID, &rid_text, &vid_text)?;
        info!(%vid, %rid, "saved id binding");
        Ok(())
    }

    /// Erases both directions of a binding.
    pub fn unbind(&self, vid: ObjectId, rid: ObjectId) -> Result<(), TranslateError> {
        self.bus.hdel(store::VID_TO_RID, &vid.to_string())?;
        self.bus.hdel(store::RID_TO_VID, &rid.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sai_bus::MemoryBus;

    fn translator() -> IdTranslator {
        IdTranslator::new(Arc::new(MemoryBus::new()))
    }

    #[test]
    fn test_null_maps_to_null() {
        let translator = translator();
        assert_eq!(translator.vid_to_rid(ObjectId::NULL).unwrap(), ObjectId::NULL);
        assert_eq!(
            translator
                .rid_to_vid(ObjectId::NULL, |_| ObjectType::Port)
                .unwrap(),
            ObjectId::NULL
        );
    }

    #[test]
    fn test_bind_then_translate_both_ways() {
        let translator = translator();
        let vid = ObjectId::pack(ObjectType::NextHop, 1);
        let rid = ObjectId::from_raw(0xabcd);

        translator.bind(vid, rid).unwrap();
        assert_eq!(translator.vid_to_rid(vid).unwrap(), rid);
        assert_eq!(translator.rid_to_vid(rid, |_| ObjectType::Null).unwrap(), vid);
    }

    #[test]
    fn test_missing_vid_is_an_error() {
        let translator = translator();
        let vid = ObjectId::pack(ObjectType::NextHop, 9);
        assert!(matches!(
            translator.vid_to_rid(vid),
            Err(TranslateError::MissingVid(v)) if v == vid
        ));
    }

    #[test]
    fn test_unknown_rid_mints_and_binds() {
        let translator = translator();
        let rid = ObjectId::from_raw(0x5500);

        let vid = translator.rid_to_vid(rid, |_| ObjectType::Port).unwrap();
        assert_eq!(vid.object_type(), ObjectType::Port);

        // second sighting reuses the binding and never consults the query
        let again = translator
            .rid_to_vid(rid, |_| unreachable!("binding exists"))
            .unwrap();
        assert_eq!(again, vid);
        assert_eq!(translator.vid_to_rid(vid).unwrap(), rid);
    }

    #[test]
    fn test_rid_with_no_type_is_an_error() {
        let translator = translator();
        let rid = ObjectId::from_raw(0x66);
        assert!(matches!(
            translator.rid_to_vid(rid, |_| ObjectType::Null),
            Err(TranslateError::UnknownRidType(r)) if r == rid
        ));
    }

    #[test]
    fn test_unbind_erases_both_directions() {
        let translator = translator();
        let vid = ObjectId::pack(ObjectType::Lag, 2);
        let rid = ObjectId::from_raw(0x77);

        translator.bind(vid, rid).unwrap();
        translator.unbind(vid, rid).unwrap();
        assert!(translator.vid_to_rid(vid).is_err());
    }

    #[test]
    fn test_allocated_vids_are_monotonic() {
        let translator = translator();
        let a = translator.allocate_vid(ObjectType::Vlan).unwrap();
        let b = translator.allocate_vid(ObjectType::Vlan).unwrap();
        assert!(b.counter() > a.counter());
    }
}
