//! Policer operations.

use crate::client::{check_gettable, find_attr, SaiClient};
use crate::refs::RefTarget;
use sai_attr::enums::{MeterType, PolicerMode};
use sai_attr::ids::policer_attr;
use sai_attr::Attribute;
use sai_types::{ObjectId, ObjectType, SaiResult, Status};
use tracing::{debug, warn};

const SETTABLE: &[u32] = &[
    policer_attr::COLOR_SOURCE,
    policer_attr::CBS,
    policer_attr::CIR,
    policer_attr::PBS,
    policer_attr::PIR,
    policer_attr::GREEN_PACKET_ACTION,
    policer_attr::YELLOW_PACKET_ACTION,
    policer_attr::RED_PACKET_ACTION,
    policer_attr::ENABLE_COUNTER_LIST,
];

const GETTABLE: &[u32] = &[
    policer_attr::METER_TYPE,
    policer_attr::MODE,
    policer_attr::COLOR_SOURCE,
    policer_attr::CBS,
    policer_attr::CIR,
    policer_attr::PBS,
    policer_attr::PIR,
    policer_attr::GREEN_PACKET_ACTION,
    policer_attr::YELLOW_PACKET_ACTION,
    policer_attr::RED_PACKET_ACTION,
    policer_attr::ENABLE_COUNTER_LIST,
];

impl SaiClient {
    pub fn create_policer(&self, attrs: &[Attribute]) -> SaiResult<ObjectId> {
        let mut state = self.inner.state.lock().unwrap();

        match find_attr(attrs, policer_attr::METER_TYPE) {
            Some(attr) => {
                let raw = attr.value.as_s32().ok_or(Status::InvalidParameter)?;
                if MeterType::from_i32(raw).is_none() {
                    warn!(raw, "invalid meter type value");
                    return Err(Status::InvalidParameter);
                }
            }
            None => {
                warn!("missing meter type attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        }

        let mode = match find_attr(attrs, policer_attr::MODE) {
            Some(attr) => {
                let raw = attr.value.as_s32().ok_or(Status::InvalidParameter)?;
                PolicerMode::from_i32(raw).ok_or_else(|| {
                    warn!(raw, "invalid policer mode value");
                    Status::InvalidParameter
                })?
            }
            None => {
                warn!("missing mode attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        };
        if mode == PolicerMode::TrTcm && find_attr(attrs, policer_attr::PIR).is_none() {
            warn!("pir attribute is mandatory for tr-tcm mode");
            return Err(Status::MandatoryAttributeMissing);
        }

        let policer_id = self.inner.allocate_vid(ObjectType::Policer)?;
        self.inner
            .push_create(ObjectType::Policer, &policer_id.to_string(), attrs)?;
        debug!(%policer_id, "inserting policer to local state");
        state.policers.insert(policer_id);
        Ok(policer_id)
    }

    pub fn remove_policer(&self, policer_id: ObjectId) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if !state.policers.contains(&policer_id) {
            warn!(%policer_id, "policer is missing");
            return Err(Status::InvalidParameter);
        }
        if state.refs.in_use(RefTarget::Object(policer_id)) {
            warn!(%policer_id, "policer is referenced");
            return Err(Status::ObjectInUse);
        }

        self.inner
            .push_remove(ObjectType::Policer, &policer_id.to_string())?;
        debug!(%policer_id, "erasing policer from local state");
        state.policers.remove(&policer_id);
        Ok(())
    }

    pub fn set_policer_attribute(&self, policer_id: ObjectId, attr: &Attribute) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.policers.contains(&policer_id) {
            warn!(%policer_id, "policer is missing");
            return Err(Status::InvalidParameter);
        }
        if !SETTABLE.contains(&attr.id) {
            warn!(id = attr.id, "setting attribute id is not supported");
            return Err(Status::InvalidParameter);
        }
        self.inner
            .push_set(ObjectType::Policer, &policer_id.to_string(), attr)
    }

    pub fn get_policer_attribute(
        &self,
        policer_id: ObjectId,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.policers.contains(&policer_id) {
            warn!(%policer_id, "policer is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, GETTABLE)?;
        self.inner
            .get_attributes(ObjectType::Policer, &policer_id.to_string(), attrs)
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;
    use sai_attr::Value;

    pub(crate) fn packets_policer(client: &SaiClient) -> ObjectId {
        client
            .create_policer(&[
                Attribute::new(
                    policer_attr::METER_TYPE,
                    Value::S32(MeterType::Packets.as_i32()),
                ),
                Attribute::new(policer_attr::MODE, Value::S32(PolicerMode::SrTcm.as_i32())),
            ])
            .unwrap()
    }
}
