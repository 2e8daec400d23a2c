//! Coordinate domains
//!
//! Every resource kind owns a fixed, finite index space `0..N`. A [`Domain`]
//! names that space, a [`Coordinate`] is a typed, validated index into it.
//! The concrete sizes below describe one chip family and are fixed for the
//! life of the program.

use crate::error::{SetError, SetResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A fixed-size index space for one resource kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Domain {
    kind: Cow<'static, str>,
    size: usize,
}

impl Domain {
    /// Create a domain descriptor
    #[inline]
    #[must_use]
    pub const fn new(kind: &'static str, size: usize) -> Self {
        Self {
            kind: Cow::Borrowed(kind),
            size,
        }
    }

    /// Resource kind name
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Number of valid indices
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Check whether `index` lies inside the domain
    #[inline]
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        index < self.size
    }

    /// Validate an index against this domain
    ///
    /// # Errors
    /// Returns [`SetError::OutOfRange`] if `index >= size`
    #[inline]
    pub fn check(&self, index: usize) -> SetResult<()> {
        if self.contains(index) {
            Ok(())
        } else {
            Err(SetError::out_of_range(index, self))
        }
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind, self.size)
    }
}

/// Typed index into a fixed [`Domain`]
///
/// Implementors are a bijection between values and `0..DOMAIN.size()`,
/// ordered by index.
pub trait Coordinate: Copy + Ord + std::fmt::Debug {
    /// The domain this coordinate lives in
    const DOMAIN: Domain;

    /// Position inside the domain
    fn index(self) -> usize;

    /// Construct from a position
    ///
    /// # Errors
    /// Returns [`SetError::OutOfRange`] for indices outside the domain
    fn from_index(index: usize) -> SetResult<Self>;
}

/// Iterate all coordinates of a domain in ascending order
pub fn all<C: Coordinate>() -> impl Iterator<Item = C> {
    (0..C::DOMAIN.size()).filter_map(|i| C::from_index(i).ok())
}

macro_rules! coordinate {
    ($(#[$meta:meta])* $name:ident, $kind:literal, $size:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "usize", into = "usize")]
        pub struct $name(usize);

        impl $name {
            /// Number of valid coordinates
            pub const SIZE: usize = $size;

            /// Create a coordinate, validating the index
            ///
            /// # Errors
            /// Returns [`SetError::OutOfRange`] for indices outside the domain
            #[inline]
            pub fn new(index: usize) -> SetResult<Self> {
                <Self as Coordinate>::from_index(index)
            }
        }

        impl Coordinate for $name {
            const DOMAIN: Domain = Domain::new($kind, $size);

            #[inline]
            fn index(self) -> usize {
                self.0
            }

            #[inline]
            fn from_index(index: usize) -> SetResult<Self> {
                if index < $size {
                    Ok(Self(index))
                } else {
                    Err(SetError::out_of_range(index, &Self::DOMAIN))
                }
            }
        }

        impl TryFrom<usize> for $name {
            type Error = SetError;

            fn try_from(index: usize) -> SetResult<Self> {
                <Self as Coordinate>::from_index(index)
            }
        }

        impl From<$name> for usize {
            fn from(c: $name) -> usize {
                c.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

coordinate!(
    /// Chip position on a wafer
    HicannOnWafer, "hicann_on_wafer", 384
);
coordinate!(
    /// Link aggregator (FPGA) position on a wafer
    FpgaOnWafer, "fpga_on_wafer", 48
);
coordinate!(
    /// Neuron circuit on a chip
    NeuronOnHicann, "neuron_on_hicann", 512
);
coordinate!(
    /// Synapse on a chip (448 rows x 256 columns)
    SynapseOnHicann, "synapse_on_hicann", 448 * 256
);
coordinate!(SynapseDriverOnHicann, "synapse_driver_on_hicann", 224);
coordinate!(SynapticInputOnHicann, "synaptic_input_on_hicann", 1024);
coordinate!(SynapseRowOnHicann, "synapse_row_on_hicann", 448);
coordinate!(AnalogOnHicann, "analog_on_hicann", 2);
coordinate!(
    BackgroundGeneratorOnHicann,
    "background_generator_on_hicann",
    8
);
coordinate!(FgBlockOnHicann, "fg_block_on_hicann", 4);
coordinate!(VRepeaterOnHicann, "vrepeater_on_hicann", 256);
coordinate!(HRepeaterOnHicann, "hrepeater_on_hicann", 64);
coordinate!(SynapseSwitchOnHicann, "synapse_switch_on_hicann", 7168);
coordinate!(CrossbarSwitchOnHicann, "crossbar_switch_on_hicann", 1024);
coordinate!(SynapseSwitchRowOnHicann, "synapse_switch_row_on_hicann", 448);
coordinate!(
    /// Horizontal bus line
    HLineOnHicann, "hline_on_hicann", 64
);
coordinate!(
    /// Vertical bus line
    VLineOnHicann, "vline_on_hicann", 256
);
coordinate!(Merger0OnHicann, "merger0_on_hicann", 8);
coordinate!(Merger1OnHicann, "merger1_on_hicann", 4);
coordinate!(Merger2OnHicann, "merger2_on_hicann", 2);
coordinate!(Merger3OnHicann, "merger3_on_hicann", 1);
coordinate!(DncMergerOnHicann, "dnc_merger_on_hicann", 8);
coordinate!(
    /// Highspeed channel between an FPGA and one of its chips
    HighspeedLinkOnDnc, "highspeed_link_on_dnc", 8
);

/// Chips served by one FPGA
pub const HICANNS_PER_FPGA: usize = HicannOnWafer::SIZE / FpgaOnWafer::SIZE;

impl HicannOnWafer {
    /// FPGA serving this chip
    ///
    /// Consecutive blocks of [`HICANNS_PER_FPGA`] chip indices share one
    /// FPGA. This is a linear stand-in for the geometric reticle mapping of
    /// the hardware; records written against the real layout need the
    /// hardware coordinate library to address the right FPGA.
    #[must_use]
    pub fn to_fpga(self) -> FpgaOnWafer {
        FpgaOnWafer(self.0 / HICANNS_PER_FPGA)
    }

    /// Highspeed link of this chip on its FPGA
    ///
    /// Position inside the block of [`HicannOnWafer::to_fpga`], with the
    /// same stand-in caveat.
    #[must_use]
    pub fn to_highspeed_link(self) -> HighspeedLinkOnDnc {
        HighspeedLinkOnDnc(self.0 % HICANNS_PER_FPGA)
    }
}

/// Wafer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WaferId(pub u32);

impl Display for WaferId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.0)
    }
}

/// Chip addressed globally
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HicannGlobal {
    /// Owning wafer
    pub wafer: WaferId,
    /// Position on the wafer
    pub hicann: HicannOnWafer,
}

impl HicannGlobal {
    /// Combine a wafer and a chip position
    #[inline]
    #[must_use]
    pub const fn new(hicann: HicannOnWafer, wafer: WaferId) -> Self {
        Self { wafer, hicann }
    }

    /// Globally addressed FPGA serving this chip
    #[must_use]
    pub fn to_fpga_global(self) -> FpgaGlobal {
        FpgaGlobal::new(self.hicann.to_fpga(), self.wafer)
    }

    /// Highspeed link of this chip on its FPGA, see
    /// [`HicannOnWafer::to_highspeed_link`]
    #[must_use]
    pub fn to_highspeed_link(self) -> HighspeedLinkOnDnc {
        self.hicann.to_highspeed_link()
    }
}

impl Display for HicannGlobal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}H{}", self.wafer, self.hicann.0)
    }
}

/// FPGA addressed globally
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FpgaGlobal {
    /// Owning wafer
    pub wafer: WaferId,
    /// Position on the wafer
    pub fpga: FpgaOnWafer,
}

impl FpgaGlobal {
    /// Combine a wafer and an FPGA position
    #[inline]
    #[must_use]
    pub const fn new(fpga: FpgaOnWafer, wafer: WaferId) -> Self {
        Self { wafer, fpga }
    }
}

impl Display for FpgaGlobal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}F{}", self.wafer, self.fpga.0)
    }
}

/// Any resource that owns a persisted record
///
/// Parsed from the short forms `W33`, `W33H100` and `W5F2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalResource {
    /// A whole wafer
    Wafer(WaferId),
    /// A single chip
    Hicann(HicannGlobal),
    /// A single FPGA
    Fpga(FpgaGlobal),
}

impl Display for GlobalResource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wafer(w) => w.fmt(f),
            Self::Hicann(h) => h.fmt(f),
            Self::Fpga(g) => g.fmt(f),
        }
    }
}

impl FromStr for GlobalResource {
    type Err = SetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix('W')
            .ok_or_else(|| SetError::parse(s, "expected leading 'W'"))?;
        let split = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (wafer, tail) = rest.split_at(split);
        let wafer = WaferId(
            wafer
                .parse()
                .map_err(|_| SetError::parse(s, "missing wafer number"))?,
        );

        let parse_index = |digits: &str| -> SetResult<usize> {
            digits
                .parse()
                .map_err(|_| SetError::parse(s, format!("invalid index '{digits}'")))
        };

        match tail.chars().next() {
            None => Ok(Self::Wafer(wafer)),
            Some('H') => {
                let hicann = HicannOnWafer::new(parse_index(&tail[1..])?)?;
                Ok(Self::Hicann(HicannGlobal::new(hicann, wafer)))
            }
            Some('F') => {
                let fpga = FpgaOnWafer::new(parse_index(&tail[1..])?)?;
                Ok(Self::Fpga(FpgaGlobal::new(fpga, wafer)))
            }
            Some(other) => Err(SetError::parse(s, format!("unknown resource tag '{other}'"))),
        }
    }
}
