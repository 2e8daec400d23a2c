//! Chip entity
//!
//! A [`Hicann`] tracks twenty kinds of on-chip resources. Its record has
//! grown over three schema versions:
//!
//! | schema | added sets |
//! |---|---|
//! | 0 | neurons, synapses, drivers, hbuses, vbuses, mergers0..3, dncmergers |
//! | 1 | synaptic_inputs |
//! | 2 | synapserows, analogs, backgroundgenerators, fgblocks, vrepeaters, hrepeaters, synapseswitches, crossbarswitches, synapseswitchrows |

use crate::entity::{Entity, UnknownSets, WithBackend};
use crate::error::{ResourceError, ResourceResult};
use wafermap_backend::{Record, RecordKey};
use wafermap_set::{
    AnalogOnHicann, BackgroundGeneratorOnHicann, Coordinate, CrossbarSwitchOnHicann,
    DncMergerOnHicann, FgBlockOnHicann, HLineOnHicann, HRepeaterOnHicann, HicannGlobal,
    Merger0OnHicann, Merger1OnHicann, Merger2OnHicann, Merger3OnHicann, NeuronOnHicann,
    ResourceSet, SetOp, SynapseDriverOnHicann, SynapseOnHicann, SynapseRowOnHicann,
    SynapseSwitchOnHicann, SynapseSwitchRowOnHicann, SynapticInputOnHicann, VLineOnHicann,
    VRepeaterOnHicann,
};

named_sets! {
    /// Defect state of one chip
    Hicann {
        kind: "hicann",
        schema: 2,
        id: HicannGlobal,
        key: |id| format!("{}-{}", id.wafer.0, id.hicann.index()),
    }
    /// Neuron circuits
    neurons / neurons_mut: NeuronOnHicann = "neurons" @ 0,
    /// Synapses
    synapses / synapses_mut: SynapseOnHicann = "synapses" @ 0,
    /// Synapse drivers
    drivers / drivers_mut: SynapseDriverOnHicann = "drivers" @ 0,
    /// Synaptic inputs of the neuron circuits
    synaptic_inputs / synaptic_inputs_mut: SynapticInputOnHicann = "synaptic_inputs" @ 1,
    /// Synapse rows
    synapserows / synapserows_mut: SynapseRowOnHicann = "synapserows" @ 2,
    /// Analog readout channels
    analogs / analogs_mut: AnalogOnHicann = "analogs" @ 2,
    /// Background event generators
    backgroundgenerators / backgroundgenerators_mut: BackgroundGeneratorOnHicann = "backgroundgenerators" @ 2,
    /// Floating gate blocks
    fgblocks / fgblocks_mut: FgBlockOnHicann = "fgblocks" @ 2,
    /// Vertical repeaters
    vrepeaters / vrepeaters_mut: VRepeaterOnHicann = "vrepeaters" @ 2,
    /// Horizontal repeaters
    hrepeaters / hrepeaters_mut: HRepeaterOnHicann = "hrepeaters" @ 2,
    /// Synapse switches
    synapseswitches / synapseswitches_mut: SynapseSwitchOnHicann = "synapseswitches" @ 2,
    /// Crossbar switches
    crossbarswitches / crossbarswitches_mut: CrossbarSwitchOnHicann = "crossbarswitches" @ 2,
    /// Synapse switch rows
    synapseswitchrows / synapseswitchrows_mut: SynapseSwitchRowOnHicann = "synapseswitchrows" @ 2,
    /// Horizontal bus lines
    hbuses / hbuses_mut: HLineOnHicann = "hbuses" @ 0,
    /// Vertical bus lines
    vbuses / vbuses_mut: VLineOnHicann = "vbuses" @ 0,
    /// First merger stage
    mergers0 / mergers0_mut: Merger0OnHicann = "merger0" @ 0,
    /// Second merger stage
    mergers1 / mergers1_mut: Merger1OnHicann = "merger1" @ 0,
    /// Third merger stage
    mergers2 / mergers2_mut: Merger2OnHicann = "merger2" @ 0,
    /// Fourth merger stage
    mergers3 / mergers3_mut: Merger3OnHicann = "merger3" @ 0,
    /// Mergers towards the FPGA link
    dncmergers / dncmergers_mut: DncMergerOnHicann = "dnc_merger" @ 0,
}

/// Chip bound to its own record
pub type HicannWithBackend = WithBackend<Hicann>;
