//! Enum-coded attribute values.
//!
//! These travel on the wire as `s32`; the library validates ranges before
//! marshalling, so each enum exposes a checked `from_i32`.

macro_rules! wire_enum {
    ($(#[$doc:meta])* $name:ident { $($variant:ident = $value:expr),+ $(,)? }) => {
        $(#[$doc])*
        #[repr(i32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            pub fn from_i32(raw: i32) -> Option<Self> {
                match raw {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub const fn as_i32(self) -> i32 {
                self as i32
            }
        }
    };
}

wire_enum! {
    /// Switch forwarding mode.
    SwitchingMode { CutThrough = 0, StoreAndForward = 1 }
}

wire_enum! {
    /// Action applied to a matched packet.
    PacketAction {
        Drop = 0,
        Forward = 1,
        Copy = 2,
        CopyCancel = 3,
        Trap = 4,
        Log = 5,
        Deny = 6,
        Transit = 7,
    }
}

wire_enum! {
    /// ECMP / LAG hash algorithm.
    HashAlgorithm { Crc = 0, Xor = 1, Random = 2 }
}

wire_enum! {
    /// Per-port FDB learning behavior.
    FdbLearningMode { Drop = 0, Disable = 1, Hw = 2, CpuTrap = 3, CpuLog = 4 }
}

wire_enum! {
    NextHopType { Ip = 0, Mpls = 1, TunnelEncap = 2 }
}

wire_enum! {
    NextHopGroupType { Ecmp = 0 }
}

wire_enum! {
    RouterInterfaceType { Port = 0, Vlan = 1, Loopback = 2 }
}

wire_enum! {
    HostifType { Netdev = 0, Fd = 1 }
}

wire_enum! {
    /// What a policer meters.
    MeterType { Packets = 0, Bytes = 1 }
}

wire_enum! {
    PolicerMode { SrTcm = 0, TrTcm = 1, StormControl = 2 }
}

wire_enum! {
    TunnelType { Ipinip = 0, IpinipGre = 1, Vxlan = 2 }
}

wire_enum! {
    TunnelTermType { P2p = 0, P2mp = 1 }
}

wire_enum! {
    /// TTL handling on tunnel encap/decap.
    TtlMode { Uniform = 0, Pipe = 1 }
}

wire_enum! {
    /// DSCP handling on tunnel encap/decap.
    DscpMode { Uniform = 0, Pipe = 1 }
}

wire_enum! {
    PortOperStatus { Unknown = 0, Up = 1, Down = 2 }
}

wire_enum! {
    SwitchOperStatus { Unknown = 0, Up = 1, Down = 2, Failed = 3 }
}

wire_enum! {
    FdbEventType { Learned = 0, Aged = 1, Flushed = 2, Moved = 3 }
}
