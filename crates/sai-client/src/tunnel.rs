//! Tunnel map, tunnel, and tunnel termination operations.

use crate::client::{check_gettable, find_attr, SaiClient};
use crate::refs::{RefTarget, KEY_REF};
use sai_attr::enums::{DscpMode, TtlMode, TunnelTermType, TunnelType};
use sai_attr::ids::{tunnel_attr, tunnel_map_attr, tunnel_term_attr};
use sai_attr::Attribute;
use sai_types::{ObjectId, ObjectType, SaiResult, Status};
use tracing::{debug, warn};

const TUNNEL_SETTABLE: &[u32] = &[tunnel_attr::ENCAP_ECN_MODE, tunnel_attr::DECAP_ECN_MODE];

const TUNNEL_GETTABLE: &[u32] = &[
    tunnel_attr::TYPE,
    tunnel_attr::UNDERLAY_INTERFACE,
    tunnel_attr::OVERLAY_INTERFACE,
    tunnel_attr::ENCAP_SRC_IP,
    tunnel_attr::ENCAP_TTL_MODE,
    tunnel_attr::ENCAP_TTL_VAL,
    tunnel_attr::ENCAP_DSCP_MODE,
    tunnel_attr::ENCAP_DSCP_VAL,
    tunnel_attr::ENCAP_GRE_KEY_VALID,
    tunnel_attr::ENCAP_GRE_KEY,
    tunnel_attr::ENCAP_ECN_MODE,
    tunnel_attr::ENCAP_MAPPERS,
    tunnel_attr::DECAP_ECN_MODE,
    tunnel_attr::DECAP_MAPPERS,
    tunnel_attr::DECAP_TTL_MODE,
    tunnel_attr::DECAP_DSCP_MODE,
];

const TERM_GETTABLE: &[u32] = &[
    tunnel_term_attr::VR_ID,
    tunnel_term_attr::TYPE,
    tunnel_term_attr::DST_IP,
    tunnel_term_attr::SRC_IP,
    tunnel_term_attr::TUNNEL_TYPE,
    tunnel_term_attr::ACTION_TUNNEL_ID,
];

impl SaiClient {
    pub fn create_tunnel_map(&self, attrs: &[Attribute]) -> SaiResult<ObjectId> {
        let mut state = self.inner.state.lock().unwrap();

        if find_attr(attrs, tunnel_map_attr::TYPE).is_none() {
            warn!("missing tunnel map type attribute");
            return Err(Status::MandatoryAttributeMissing);
        }
        if find_attr(attrs, tunnel_map_attr::MAP_TO_VALUE_LIST).is_none() {
            warn!("missing map to value list attribute");
            return Err(Status::MandatoryAttributeMissing);
        }

        let map_id = self.inner.allocate_vid(ObjectType::TunnelMap)?;
        self.inner
            .push_create(ObjectType::TunnelMap, &map_id.to_string(), attrs)?;
        debug!(%map_id, "inserting tunnel map to local state");
        state.tunnel_maps.insert(map_id);
        Ok(map_id)
    }

    pub fn remove_tunnel_map(&self, map_id: ObjectId) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if !state.tunnel_maps.contains(&map_id) {
            warn!(%map_id, "tunnel map is missing");
            return Err(Status::InvalidParameter);
        }
        if state.refs.in_use(RefTarget::Object(map_id)) {
            warn!(%map_id, "tunnel map is referenced");
            return Err(Status::ObjectInUse);
        }

        self.inner
            .push_remove(ObjectType::TunnelMap, &map_id.to_string())?;
        debug!(%map_id, "erasing tunnel map from local state");
        state.tunnel_maps.remove(&map_id);
        Ok(())
    }

    pub fn create_tunnel(&self, attrs: &[Attribute]) -> SaiResult<ObjectId> {
        let mut state = self.inner.state.lock().unwrap();

        let tunnel_type = match find_attr(attrs, tunnel_attr::TYPE) {
            Some(attr) => {
                let raw = attr.value.as_s32().ok_or(Status::InvalidParameter)?;
                TunnelType::from_i32(raw).ok_or_else(|| {
                    warn!(raw, "invalid tunnel type");
                    Status::InvalidParameter
                })?
            }
            None => {
                warn!("missing tunnel type attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        };

        let mut refs: Vec<(u32, Vec<RefTarget>)> = Vec::new();

        if matches!(tunnel_type, TunnelType::Ipinip | TunnelType::IpinipGre) {
            for id in [tunnel_attr::UNDERLAY_INTERFACE, tunnel_attr::OVERLAY_INTERFACE] {
                let rif = match find_attr(attrs, id) {
                    Some(attr) => attr.value.as_oid().ok_or(Status::InvalidParameter)?,
                    None => {
                        warn!(id, "missing tunnel interface attribute");
                        return Err(Status::MandatoryAttributeMissing);
                    }
                };
                if !state.router_interfaces.contains(&rif) {
                    warn!(%rif, "router interface is missing");
                    return Err(Status::InvalidParameter);
                }
                refs.push((id, vec![RefTarget::Object(rif)]));
            }
        }

        // pipe modes carry explicit values
        if let Some(attr) = find_attr(attrs, tunnel_attr::ENCAP_TTL_MODE) {
            let raw = attr.value.as_s32().ok_or(Status::InvalidParameter)?;
            let mode = TtlMode::from_i32(raw).ok_or(Status::InvalidParameter)?;
            if mode == TtlMode::Pipe && find_attr(attrs, tunnel_attr::ENCAP_TTL_VAL).is_none() {
                warn!("encap ttl pipe mode requires a ttl value");
                return Err(Status::MandatoryAttributeMissing);
            }
        }
        if let Some(attr) = find_attr(attrs, tunnel_attr::ENCAP_DSCP_MODE) {
            let raw = attr.value.as_s32().ok_or(Status::InvalidParameter)?;
            let mode = DscpMode::from_i32(raw).ok_or(Status::InvalidParameter)?;
            if mode == DscpMode::Pipe && find_attr(attrs, tunnel_attr::ENCAP_DSCP_VAL).is_none() {
                warn!("encap dscp pipe mode requires a dscp value");
                return Err(Status::MandatoryAttributeMissing);
            }
        }
        if let Some(attr) = find_attr(attrs, tunnel_attr::ENCAP_GRE_KEY_VALID) {
            let valid = attr.value.as_bool().ok_or(Status::InvalidParameter)?;
            if valid && find_attr(attrs, tunnel_attr::ENCAP_GRE_KEY).is_none() {
                warn!("gre key marked valid but missing");
                return Err(Status::MandatoryAttributeMissing);
            }
        }

        for id in [tunnel_attr::ENCAP_MAPPERS, tunnel_attr::DECAP_MAPPERS] {
            if let Some(attr) = find_attr(attrs, id) {
                let mappers = attr
                    .value
                    .as_object_list()
                    .ok_or(Status::InvalidParameter)?;
                for mapper in mappers {
                    if !state.tunnel_maps.contains(mapper) {
                        warn!(%mapper, "tunnel map is missing");
                        return Err(Status::InvalidParameter);
                    }
                }
                refs.push((id, mappers.iter().copied().map(RefTarget::Object).collect()));
            }
        }

        let tunnel_id = self.inner.allocate_vid(ObjectType::Tunnel)?;
        self.inner
            .push_create(ObjectType::Tunnel, &tunnel_id.to_string(), attrs)?;
        debug!(%tunnel_id, "inserting tunnel to local state");
        state.tunnels.insert(tunnel_id);
        let holder = tunnel_id.to_string();
        for (attr, targets) in refs {
            state.refs.acquire(&holder, attr, targets);
        }
        Ok(tunnel_id)
    }

    pub fn remove_tunnel(&self, tunnel_id: ObjectId) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if !state.tunnels.contains(&tunnel_id) {
            warn!(%tunnel_id, "tunnel is missing");
            return Err(Status::InvalidParameter);
        }
        if state.refs.in_use(RefTarget::Object(tunnel_id)) {
            warn!(%tunnel_id, "tunnel is referenced");
            return Err(Status::ObjectInUse);
        }

        self.inner
            .push_remove(ObjectType::Tunnel, &tunnel_id.to_string())?;
        debug!(%tunnel_id, "erasing tunnel from local state");
        state.tunnels.remove(&tunnel_id);
        state.refs.release_holder(&tunnel_id.to_string());
        Ok(())
    }

    pub fn set_tunnel_attribute(&self, tunnel_id: ObjectId, attr: &Attribute) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.tunnels.contains(&tunnel_id) {
            warn!(%tunnel_id, "tunnel is missing");
            return Err(Status::InvalidParameter);
        }
        if !TUNNEL_SETTABLE.contains(&attr.id) {
            warn!(id = attr.id, "setting attribute id is not supported");
            return Err(Status::InvalidParameter);
        }
        self.inner
            .push_set(ObjectType::Tunnel, &tunnel_id.to_string(), attr)
    }

    pub fn get_tunnel_attribute(
        &self,
        tunnel_id: ObjectId,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.tunnels.contains(&tunnel_id) {
            warn!(%tunnel_id, "tunnel is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, TUNNEL_GETTABLE)?;
        self.inner
            .get_attributes(ObjectType::Tunnel, &tunnel_id.to_string(), attrs)
    }

    pub fn create_tunnel_term_table_entry(&self, attrs: &[Attribute]) -> SaiResult<ObjectId> {
        let mut state = self.inner.state.lock().unwrap();

        let vr_id = match find_attr(attrs, tunnel_term_attr::VR_ID) {
            Some(attr) => attr.value.as_oid().ok_or(Status::InvalidParameter)?,
            None => {
                warn!("missing virtual router id attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        };
        if !state.is_virtual_router(vr_id) {
            warn!(%vr_id, "virtual router is missing");
            return Err(Status::InvalidParameter);
        }

        let term_type = match find_attr(attrs, tunnel_term_attr::TYPE) {
            Some(attr) => {
                let raw = attr.value.as_s32().ok_or(Status::InvalidParameter)?;
                TunnelTermType::from_i32(raw).ok_or(Status::InvalidParameter)?
            }
            None => {
                warn!("missing termination type attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        };
        if term_type == TunnelTermType::P2p && find_attr(attrs, tunnel_term_attr::SRC_IP).is_none()
        {
            warn!("point-to-point termination requires a source ip");
            return Err(Status::MandatoryAttributeMissing);
        }
        for id in [tunnel_term_attr::DST_IP, tunnel_term_attr::TUNNEL_TYPE] {
            if find_attr(attrs, id).is_none() {
                warn!(id, "missing mandatory termination attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        }

        let tunnel_id = match find_attr(attrs, tunnel_term_attr::ACTION_TUNNEL_ID) {
            Some(attr) => attr.value.as_oid().ok_or(Status::InvalidParameter)?,
            None => {
                warn!("missing action tunnel id attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        };
        if !state.tunnels.contains(&tunnel_id) {
            warn!(%tunnel_id, "tunnel is missing");
            return Err(Status::InvalidParameter);
        }

        let term_id = self.inner.allocate_vid(ObjectType::TunnelTermTableEntry)?;
        self.inner
            .push_create(ObjectType::TunnelTermTableEntry, &term_id.to_string(), attrs)?;
        debug!(%term_id, "inserting tunnel termination to local state");
        state.tunnel_terms.insert(term_id);
        let holder = term_id.to_string();
        state.refs.acquire(&holder, KEY_REF, vec![RefTarget::Object(vr_id)]);
        state.refs.acquire(
            &holder,
            tunnel_term_attr::ACTION_TUNNEL_ID,
            vec![RefTarget::Object(tunnel_id)],
        );
        Ok(term_id)
    }

    pub fn remove_tunnel_term_table_entry(&self, term_id: ObjectId) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if !state.tunnel_terms.contains(&term_id) {
            warn!(%term_id, "tunnel termination is missing");
            return Err(Status::InvalidParameter);
        }

        self.inner
            .push_remove(ObjectType::TunnelTermTableEntry, &term_id.to_string())?;
        debug!(%term_id, "erasing tunnel termination from local state");
        state.tunnel_terms.remove(&term_id);
        state.refs.release_holder(&term_id.to_string());
        Ok(())
    }

    pub fn get_tunnel_term_table_entry_attribute(
        &self,
        term_id: ObjectId,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.tunnel_terms.contains(&term_id) {
            warn!(%term_id, "tunnel termination is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, TERM_GETTABLE)?;
        self.inner
            .get_attributes(ObjectType::TunnelTermTableEntry, &term_id.to_string(), attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support;
    use crate::next_hop::test_fixtures;
    use sai_attr::{TunnelMapEntry, Value};
    use pretty_assertions::assert_eq;

    fn tunnel_map(client: &SaiClient) -> ObjectId {
        client
            .create_tunnel_map(&[
                Attribute::new(tunnel_map_attr::TYPE, Value::S32(0)),
                Attribute::new(
                    tunnel_map_attr::MAP_TO_VALUE_LIST,
                    Value::TunnelMapList(vec![TunnelMapEntry { map_type: 0, key: 100, value: 5000 }]),
                ),
            ])
            .unwrap()
    }

    fn ipinip_tunnel(client: &SaiClient, underlay: ObjectId, overlay: ObjectId) -> ObjectId {
        client
            .create_tunnel(&[
                Attribute::new(tunnel_attr::TYPE, Value::S32(TunnelType::Ipinip.as_i32())),
                Attribute::oid(tunnel_attr::UNDERLAY_INTERFACE, underlay),
                Attribute::oid(tunnel_attr::OVERLAY_INTERFACE, overlay),
            ])
            .unwrap()
    }

    #[test]
    fn test_tunnel_map_mandatory_attributes() {
        let (client, bus) = test_support::client();
        assert_eq!(
            client.create_tunnel_map(&[Attribute::new(tunnel_map_attr::TYPE, Value::S32(0))]),
            Err(Status::MandatoryAttributeMissing)
        );
        assert_eq!(test_support::next_request(&bus), None);
        tunnel_map(&client);
    }

    #[test]
    fn test_ipinip_requires_existing_interfaces() {
        let (client, _bus) = test_support::client();
        let ghost = ObjectId::pack(ObjectType::RouterInterface, 0xdead);
        assert_eq!(
            client.create_tunnel(&[
                Attribute::new(tunnel_attr::TYPE, Value::S32(TunnelType::Ipinip.as_i32())),
                Attribute::oid(tunnel_attr::UNDERLAY_INTERFACE, ghost),
                Attribute::oid(tunnel_attr::OVERLAY_INTERFACE, ghost),
            ]),
            Err(Status::InvalidParameter)
        );

        let underlay = test_fixtures::loopback_rif(&client);
        let overlay = test_fixtures::loopback_rif(&client);
        let tunnel = ipinip_tunnel(&client, underlay, overlay);

        // interfaces are pinned by the tunnel
        assert_eq!(client.remove_router_interface(underlay), Err(Status::ObjectInUse));
        client.remove_tunnel(tunnel).unwrap();
        client.remove_router_interface(underlay).unwrap();
    }

    #[test]
    fn test_pipe_modes_require_values() {
        let (client, _bus) = test_support::client();
        let underlay = test_fixtures::loopback_rif(&client);
        let overlay = test_fixtures::loopback_rif(&client);

        assert_eq!(
            client.create_tunnel(&[
                Attribute::new(tunnel_attr::TYPE, Value::S32(TunnelType::Ipinip.as_i32())),
                Attribute::oid(tunnel_attr::UNDERLAY_INTERFACE, underlay),
                Attribute::oid(tunnel_attr::OVERLAY_INTERFACE, overlay),
                Attribute::new(tunnel_attr::ENCAP_TTL_MODE, Value::S32(TtlMode::Pipe.as_i32())),
            ]),
            Err(Status::MandatoryAttributeMissing)
        );
    }

    #[test]
    fn test_termination_requires_tunnel_and_src_ip_for_p2p() {
        let (client, _bus) = test_support::client();
        let underlay = test_fixtures::loopback_rif(&client);
        let overlay = test_fixtures::loopback_rif(&client);
        let tunnel = ipinip_tunnel(&client, underlay, overlay);
        let vr = client.create_virtual_router(&[]).unwrap();

        let mut attrs = vec![
            Attribute::oid(tunnel_term_attr::VR_ID, vr),
            Attribute::new(
                tunnel_term_attr::TYPE,
                Value::S32(TunnelTermType::P2p.as_i32()),
            ),
            Attribute::new(
                tunnel_term_attr::DST_IP,
                Value::IpAddress("10.0.0.1".parse().unwrap()),
            ),
            Attribute::new(
                tunnel_term_attr::TUNNEL_TYPE,
                Value::S32(TunnelType::Ipinip.as_i32()),
            ),
            Attribute::oid(tunnel_term_attr::ACTION_TUNNEL_ID, tunnel),
        ];
        // p2p without a source ip
        assert_eq!(
            client.create_tunnel_term_table_entry(&attrs),
            Err(Status::MandatoryAttributeMissing)
        );

        attrs.push(Attribute::new(
            tunnel_term_attr::SRC_IP,
            Value::IpAddress("10.0.0.2".parse().unwrap()),
        ));
        let term = client.create_tunnel_term_table_entry(&attrs).unwrap();

        assert_eq!(client.remove_tunnel(tunnel), Err(Status::ObjectInUse));
        client.remove_tunnel_term_table_entry(term).unwrap();
        client.remove_tunnel(tunnel).unwrap();
    }
}
