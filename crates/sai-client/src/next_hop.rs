//! Next hop operations.

use crate::client::{check_gettable, find_attr, SaiClient};
use crate::refs::RefTarget;
use sai_attr::enums::NextHopType;
use sai_attr::ids::next_hop_attr;
use sai_attr::Attribute;
use sai_types::{ObjectId, ObjectType, SaiResult, Status};
use tracing::{debug, warn};

const GETTABLE: &[u32] = &[
    next_hop_attr::TYPE,
    next_hop_attr::IP,
    next_hop_attr::ROUTER_INTERFACE_ID,
    next_hop_attr::TUNNEL_ID,
];

impl SaiClient {
    pub fn create_next_hop(&self, attrs: &[Attribute]) -> SaiResult<ObjectId> {
        let mut state = self.inner.state.lock().unwrap();

        let hop_type = match find_attr(attrs, next_hop_attr::TYPE) {
            Some(attr) => {
                let raw = attr.value.as_s32().ok_or(Status::InvalidParameter)?;
                NextHopType::from_i32(raw).ok_or_else(|| {
                    warn!(raw, "invalid type attribute value");
                    Status::InvalidParameter
                })?
            }
            None => {
                warn!("missing type attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        };

        let mut refs: Vec<(u32, Vec<RefTarget>)> = Vec::new();
        match hop_type {
            NextHopType::Ip => {
                if find_attr(attrs, next_hop_attr::IP).is_none() {
                    warn!("ip attribute is missing");
                    return Err(Status::MandatoryAttributeMissing);
                }
            }
            NextHopType::TunnelEncap => {
                let tunnel_id = match find_attr(attrs, next_hop_attr::TUNNEL_ID) {
                    Some(attr) => attr.value.as_oid().ok_or(Status::InvalidParameter)?,
                    None => {
                        warn!("tunnel id attribute is missing");
                        return Err(Status::MandatoryAttributeMissing);
                    }
                };
                if !state.tunnels.contains(&tunnel_id) {
                    warn!(%tunnel_id, "tunnel is missing");
                    return Err(Status::InvalidParameter);
                }
                refs.push((next_hop_attr::TUNNEL_ID, vec![RefTarget::Object(tunnel_id)]));
            }
            NextHopType::Mpls => {
                warn!("mpls next hops are not supported");
                return Err(Status::NotSupported);
            }
        }

        let rif_id = match find_attr(attrs, next_hop_attr::ROUTER_INTERFACE_ID) {
            Some(attr) => attr.value.as_oid().ok_or(Status::InvalidParameter)?,
            None => {
                warn!("missing router interface id attribute");
                return Err(Status::MandatoryAttributeMissing);
            }
        };
        if !state.router_interfaces.contains(&rif_id) {
            warn!(%rif_id, "router interface is missing");
            return Err(Status::InvalidParameter);
        }
        refs.push((
            next_hop_attr::ROUTER_INTERFACE_ID,
            vec![RefTarget::Object(rif_id)],
        ));

        let next_hop_id = self.inner.allocate_vid(ObjectType::NextHop)?;
        self.inner
            .push_create(ObjectType::NextHop, &next_hop_id.to_string(), attrs)?;
        debug!(%next_hop_id, "inserting next hop to local state");
        state.next_hops.insert(next_hop_id);
        let holder = next_hop_id.to_string();
        for (attr, targets) in refs {
            state.refs.acquire(&holder, attr, targets);
        }
        Ok(next_hop_id)
    }

    pub fn remove_next_hop(&self, next_hop_id: ObjectId) -> SaiResult<()> {
        let mut state = self.inner.state.lock().unwrap();
        if !state.next_hops.contains(&next_hop_id) {
            warn!(%next_hop_id, "next hop is missing");
            return Err(Status::InvalidParameter);
        }
        if state.refs.in_use(RefTarget::Object(next_hop_id)) {
            warn!(%next_hop_id, "next hop is referenced");
            return Err(Status::ObjectInUse);
        }

        self.inner
            .push_remove(ObjectType::NextHop, &next_hop_id.to_string())?;
        debug!(%next_hop_id, "erasing next hop from local state");
        state.next_hops.remove(&next_hop_id);
        state.refs.release_holder(&next_hop_id.to_string());
        Ok(())
    }

    pub fn set_next_hop_attribute(&self, next_hop_id: ObjectId, attr: &Attribute) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.next_hops.contains(&next_hop_id) {
            warn!(%next_hop_id, "next hop is missing");
            return Err(Status::InvalidParameter);
        }
        // next hops have no settable attributes
        warn!(id = attr.id, "setting attribute id is not supported");
        Err(Status::InvalidParameter)
    }

    pub fn get_next_hop_attribute(
        &self,
        next_hop_id: ObjectId,
        attrs: &mut [Attribute],
    ) -> SaiResult<()> {
        let state = self.inner.state.lock().unwrap();
        if !state.next_hops.contains(&next_hop_id) {
            warn!(%next_hop_id, "next hop is missing");
            return Err(Status::InvalidParameter);
        }
        check_gettable(attrs, GETTABLE)?;
        self.inner
            .get_attributes(ObjectType::NextHop, &next_hop_id.to_string(), attrs)
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;
    use sai_attr::enums::RouterInterfaceType;
    use sai_attr::ids::router_interface_attr;
    use sai_attr::Value;

    /// Builds the default-vr → loopback-rif chain most tests hang off.
    pub(crate) fn loopback_rif(client: &SaiClient) -> ObjectId {
        let vr = client.create_virtual_router(&[]).unwrap();
        client
            .create_router_interface(&[
                Attribute::oid(router_interface_attr::VIRTUAL_ROUTER_ID, vr),
                Attribute::new(
                    router_interface_attr::TYPE,
                    Value::S32(RouterInterfaceType::Loopback.as_i32()),
                ),
            ])
            .unwrap()
    }

    pub(crate) fn ip_next_hop(client: &SaiClient, rif: ObjectId, ip: &str) -> ObjectId {
        client
            .create_next_hop(&[
                Attribute::new(next_hop_attr::TYPE, Value::S32(NextHopType::Ip.as_i32())),
                Attribute::new(next_hop_attr::IP, Value::IpAddress(ip.parse().unwrap())),
                Attribute::oid(next_hop_attr::ROUTER_INTERFACE_ID, rif),
            ])
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support;
    use sai_attr::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_requires_type_and_rif() {
        let (client, bus) = test_support::client();

        assert_eq!(
            client.create_next_hop(&[]),
            Err(Status::MandatoryAttributeMissing)
        );

        // ip type without the ip attribute
        assert_eq!(
            client.create_next_hop(&[Attribute::new(
                next_hop_attr::TYPE,
                Value::S32(NextHopType::Ip.as_i32())
            )]),
            Err(Status::MandatoryAttributeMissing)
        );

        // complete list but the rif does not exist
        let ghost_rif = ObjectId::pack(ObjectType::RouterInterface, 0xdead);
        assert_eq!(
            client.create_next_hop(&[
                Attribute::new(next_hop_attr::TYPE, Value::S32(NextHopType::Ip.as_i32())),
                Attribute::new(next_hop_attr::IP, Value::IpAddress("10.0.0.1".parse().unwrap())),
                Attribute::oid(next_hop_attr::ROUTER_INTERFACE_ID, ghost_rif),
            ]),
            Err(Status::InvalidParameter)
        );
        assert_eq!(test_support::next_request(&bus), None);
    }

    #[test]
    fn test_create_and_remove() {
        let (client, _bus) = test_support::client();
        let rif = test_fixtures::loopback_rif(&client);
        let next_hop = test_fixtures::ip_next_hop(&client, rif, "10.0.0.1");
        assert_eq!(next_hop.object_type(), ObjectType::NextHop);

        // the rif is now referenced
        assert_eq!(client.remove_router_interface(rif), Err(Status::ObjectInUse));

        client.remove_next_hop(next_hop).unwrap();
        client.remove_router_interface(rif).unwrap();
    }

    #[test]
    fn test_tunnel_encap_requires_existing_tunnel() {
        let (client, _bus) = test_support::client();
        let rif = test_fixtures::loopback_rif(&client);
        let ghost_tunnel = ObjectId::pack(ObjectType::Tunnel, 3);

        assert_eq!(
            client.create_next_hop(&[
                Attribute::new(
                    next_hop_attr::TYPE,
                    Value::S32(NextHopType::TunnelEncap.as_i32())
                ),
                Attribute::oid(next_hop_attr::TUNNEL_ID, ghost_tunnel),
                Attribute::oid(next_hop_attr::ROUTER_INTERFACE_ID, rif),
            ]),
            Err(Status::InvalidParameter)
        );
    }

    #[test]
    fn test_no_settable_attributes() {
        let (client, _bus) = test_support::client();
        let rif = test_fixtures::loopback_rif(&client);
        let next_hop = test_fixtures::ip_next_hop(&client, rif, "10.0.0.1");

        assert_eq!(
            client.set_next_hop_attribute(
                next_hop,
                &Attribute::new(next_hop_attr::TYPE, Value::S32(0))
            ),
            Err(Status::InvalidParameter)
        );
    }
}
