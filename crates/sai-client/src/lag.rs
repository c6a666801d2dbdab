//! LAG and LAG member operations.

use crate::client::{check_gettable, find_attr, SaiClient};
use crate::refs::RefTarget;
use sai_attr::ids::{lag_attr, lag_member_attr};
use sai_attr::Attribute;
use sai_types::{ObjectId, ObjectType, SaiResult, Status};
use tracing::{debug, warn};

const MEMBER_SETTABLE: &[u32] = &[
    lag_member_attr::EGRESS_DISABLE,
    lag_member_attr::INGRESS_DISABLE,
];

const MEMBER_GETTABLE: &[u32] = &[
    lag_member_attr::LAG_ID,
    lag_member_attr::PORT_ID,
    lag_member_attr::EGRESS_DISABLE,
    lag_member_attr::INGRESS_DISABLE,
];

impl SaiClient {
    pub fn create_lag(&self, attrs: &[Attribute]) -> SaiResult<ObjectId> {
        let mut state = self.inner.state.lock().unwrap();
        let lag_id = self.inner.allocate_vid(ObjectType::Lag)?;
        self.inner
            .push_create(ObjectType::Lag, &lag_id.to_string(), attrs)?;
        debug!(%lag_id, "inserting lag to local state");
        state.lags.insert(lag_id);
        Ok(lag_id)
    }

    pub fn remove_lag(&self, lag_id: ObjectId) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if !state.lags.contains(&lag_id) {
            warn!(%lag_id, "lag is missing");
            return Err(Status::InvalidParameter);
        }
        if state.refs.in_use(RefTarget::Object(lag_id)) {
            warn!(%lag_id, "lag is referenced");
            return Err(Status::ObjectInUse);
        }

        self.inner.push_remove(ObjectType::Lag, &lag_id.to_string())?;
        debug!(%lag_id, "erasing lag from local state");
        state.lags.remove(&lag_id);
        Ok(())
    }

    pub fn set_lag_attribute(&self, lag_id: ObjectId, attr: &Attribute) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.lags.contains(&lag_id) {
            warn!(%lag_id, "lag is missing");
            return Err(Status::InvalidParameter);
        }
        warn!(id = attr.id, "setting attribute id is not supported");
        Err(Status::InvalidParameter)
    }

    pub fn get_lag_attribute(&self, lag_id: ObjectId, attrs: &mut [Attribute]) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.lags.contains(&lag_id) {
            warn!(%lag_id, "lag is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, &[lag_attr::PORT_LIST])?;
        self.inner
            .get_attributes(ObjectType::Lag, &lag_id.to_string(), attrs)
    }

    pub fn create_lag_member(&self, attrs: &[Attribute]) -> SaiResult<ObjectId> {
        let mut state = self.inner.state.lock().unwrap();

        let lag_id = match find_attr(attrs, lag_member_attr::LAG_ID) {
            Some(attr) => attr.value.as_oid().ok_or(Status::InvalidParameter)?,
            None => {
                warn!("missing lag id attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        };
        if !state.lags.contains(&lag_id) {
            warn!(%lag_id, "lag is missing");
            return Err(Status::InvalidParameter);
        }

        let port_id = match find_attr(attrs, lag_member_attr::PORT_ID) {
            Some(attr) => attr.value.as_oid().ok_or(Status::InvalidParameter)?,
            None => {
                warn!("missing port id attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        };
        if port_id.object_type() != ObjectType::Port {
            warn!(%port_id, "object is not a port");
            return Err(Status::InvalidParameter);
        }
        if !state.is_port(port_id) {
            warn!(%port_id, "port is missing");
            return Err(Status::InvalidParameter);
        }

        let member_id = self.inner.allocate_vid(ObjectType::LagMember)?;
        self.inner
            .push_create(ObjectType::LagMember, &member_id.to_string(), attrs)?;
        debug!(%member_id, "inserting lag member to local state");
        state.lag_members.insert(member_id);
        let holder = member_id.to_string();
        state
            .refs
            .acquire(&holder, lag_member_attr::LAG_ID, vec![RefTarget::Object(lag_id)]);
        state
            .refs
            .acquire(&holder, lag_member_attr::PORT_ID, vec![RefTarget::Object(port_id)]);
        Ok(member_id)
    }

    pub fn remove_lag_member(&self, member_id: ObjectId) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if !state.lag_members.contains(&member_id) {
            warn!(%member_id, "lag member is missing");
            return Err(Status::InvalidParameter);
        }

        self.inner
            .push_remove(ObjectType::LagMember, &member_id.to_string())?;
        debug!(%member_id, "erasing lag member from local state");
        state.lag_members.remove(&member_id);
        state.refs.release_holder(&member_id.to_string());
        Ok(())
    }

    pub fn set_lag_member_attribute(&self, member_id: ObjectId, attr: &Attribute) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.lag_members.contains(&member_id) {
            warn!(%member_id, "lag member is missing");
            return Err(Status::InvalidParameter);
        }
        if !MEMBER_SETTABLE.contains(&attr.id) {
            warn!(id = attr.id, "setting attribute id is not supported");
            return Err(Status::InvalidParameter);
        }
        self.inner
            .push_set(ObjectType::LagMember, &member_id.to_string(), attr)
    }

    pub fn get_lag_member_attribute(
        &self,
        member_id: ObjectId,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.lag_members.contains(&member_id) {
            warn!(%member_id, "lag member is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, MEMBER_GETTABLE)?;
        self.inner
            .get_attributes(ObjectType::LagMember, &member_id.to_string(), attrs)
    }
}
