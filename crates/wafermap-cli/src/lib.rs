//! wafermap command line tools
//!
//! Query, edit, combine and seed defect records stored by a wafermap
//! backend. Resources are addressed by their short forms `W33`, `W33H100`
//! and `W5F2`.
//!
//! Exit status: `0` when a predicate holds or an edit succeeded, `1` when a
//! predicate does not hold, `2` on errors.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use wafermap_backend::{open_backend, ConfigValue, JsonDirBackend, SharedBackend};
use wafermap_resources::{
    Entity, Fpga, FpgaWithBackend, Hicann, Wafer, WaferWithBackend, WithBackend,
};
use wafermap_set::{GlobalResource, HicannGlobal, HicannOnWafer, SetOp, SwitchMode, WaferId};

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "wafermap")]
#[command(version)]
#[command(about = "Inspect and combine defect data of wafer-scale hardware")]
pub struct Cli {
    /// Storage adapter
    #[arg(long, global = true, default_value = JsonDirBackend::KIND)]
    pub backend: String,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print whether each index is available in a named set
    Has(ComponentArgs),

    /// Mark indices available and save
    Enable(ComponentArgs),

    /// Mark indices defective and save
    Disable(ComponentArgs),

    /// Combine resources from input stores into the output store
    SetOp {
        /// Resources, e.g. W33 W33H100 W5F2
        #[arg(required = true)]
        resources: Vec<GlobalResource>,

        /// Output store, may be empty
        #[arg(short, long)]
        output: PathBuf,

        /// Input stores, records must exist
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Operation folded over the inputs
        #[arg(short = 's', long = "set-operation", default_value = "intersection")]
        op: SetOp,
    },

    /// Write all-uninitialized records
    Init {
        /// Resources, e.g. W33 W33H100 W5F2
        #[arg(required = true)]
        resources: Vec<GlobalResource>,

        /// Store to write into, created if missing
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Succeed if the wafer has the chip
    WaferHasHicann(ChipArgs),

    /// Succeed if the FPGA link of the chip is available
    HicannHasHighspeed(ChipArgs),
}

/// Arguments of `has`, `enable` and `disable`
#[derive(Debug, clap::Args)]
pub struct ComponentArgs {
    /// Store to read from
    pub backend_path: PathBuf,

    /// Resource, e.g. W33, W5F2, W12H100
    pub resource: GlobalResource,

    /// Named set of the resource, e.g. neurons
    pub component: String,

    /// Indices inside the named set
    #[arg(required = true)]
    pub indices: Vec<usize>,
}

/// Arguments of the chip predicates
#[derive(Debug, clap::Args)]
pub struct ChipArgs {
    /// Wafer number
    #[arg(long)]
    pub wafer: u32,

    /// Chip index on the wafer
    #[arg(long)]
    pub hicann: usize,

    /// Store holding the defect records
    #[arg(long = "defects-path", alias = "defects_path")]
    pub defects_path: PathBuf,
}

/// Outcome of a successful invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Predicate holds or edit done
    Pass,
    /// Predicate does not hold
    Fail,
}

impl Verdict {
    fn from_bool(ok: bool) -> Self {
        if ok {
            Self::Pass
        } else {
            Self::Fail
        }
    }
}

impl From<Verdict> for ExitCode {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Pass => ExitCode::SUCCESS,
            Verdict::Fail => ExitCode::from(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Has,
    Enable,
    Disable,
}

/// Dispatch a generic helper over the entity kind of a resource
macro_rules! dispatch {
    ($resource:expr, $f:ident ( $($arg:expr),* $(,)? )) => {
        match $resource {
            GlobalResource::Wafer(id) => $f::<Wafer>(id, $($arg),*),
            GlobalResource::Hicann(id) => $f::<Hicann>(id, $($arg),*),
            GlobalResource::Fpga(id) => $f::<Fpga>(id, $($arg),*),
        }
    };
}

/// Execute a parsed command line
///
/// # Errors
/// Invalid coordinates, unknown set names, storage failures
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<Verdict> {
    let kind = cli.backend.as_str();
    match &cli.command {
        Command::Has(args) => component(kind, args, Action::Has, out),
        Command::Enable(args) => component(kind, args, Action::Enable, out),
        Command::Disable(args) => component(kind, args, Action::Disable, out),
        Command::SetOp {
            resources,
            output,
            input,
            op,
        } => {
            let target = open_store(kind, output, true)?;
            let sources = input
                .iter()
                .map(|path| open_store(kind, path, false))
                .collect::<Result<Vec<_>>>()?;
            for &resource in resources {
                dispatch!(resource, combine_into(&target, &sources, *op))?;
                writeln!(out, "{resource}: {op} of {} inputs", sources.len())?;
            }
            Ok(Verdict::Pass)
        }
        Command::Init { resources, output } => {
            let target = open_store(kind, output, true)?;
            for &resource in resources {
                dispatch!(resource, init_record(&target))?;
                writeln!(out, "{resource}: initialized")?;
            }
            Ok(Verdict::Pass)
        }
        Command::WaferHasHicann(args) => {
            let (store, hicann) = chip_query(kind, args)?;
            let wafer = WaferWithBackend::open(store, hicann.wafer, true)?;
            Ok(Verdict::from_bool(wafer.has_hicann(hicann.hicann)))
        }
        Command::HicannHasHighspeed(args) => {
            let (store, hicann) = chip_query(kind, args)?;
            let fpga = FpgaWithBackend::open(store, hicann.to_fpga_global(), true)?;
            let available = fpga.hslinks().has_coord(hicann.to_highspeed_link())?;
            Ok(Verdict::from_bool(available))
        }
    }
}

fn open_store(kind: &str, path: &Path, create: bool) -> Result<SharedBackend> {
    let options = [
        ("path", ConfigValue::from(path.to_string_lossy().into_owned())),
        ("create", ConfigValue::from(create)),
    ];
    open_backend(kind, options)
        .with_context(|| format!("opening {kind} store {}", path.display()))
}

fn chip_query(kind: &str, args: &ChipArgs) -> Result<(SharedBackend, HicannGlobal)> {
    let hicann = HicannGlobal::new(HicannOnWafer::new(args.hicann)?, WaferId(args.wafer));
    Ok((open_store(kind, &args.defects_path, false)?, hicann))
}

fn component(
    kind: &str,
    args: &ComponentArgs,
    action: Action,
    out: &mut impl Write,
) -> Result<Verdict> {
    let store = open_store(kind, &args.backend_path, false)?;
    dispatch!(args.resource, edit_component(store, args, action, out))
}

fn edit_component<E: Entity>(
    id: E::Id,
    store: SharedBackend,
    args: &ComponentArgs,
    action: Action,
    out: &mut impl Write,
) -> Result<Verdict> {
    let mut bound = WithBackend::<E>::open(store, id, true)?;
    let set = bound
        .named_set_mut(&args.component)
        .with_context(|| format!("{} sets: {}", E::KIND, E::set_names().join(", ")))?;

    let mut all = true;
    for &index in &args.indices {
        match action {
            Action::Has => {
                let has = set.has(index)?;
                writeln!(out, "{has}")?;
                all &= has;
            }
            Action::Enable => set.enable_with(index, SwitchMode::NonThrow)?,
            Action::Disable => set.disable_with(index, SwitchMode::NonThrow)?,
        }
    }

    if action != Action::Has {
        bound.save()?;
        tracing::info!(
            "{id}: {} {} {:?}",
            action_name(action),
            args.component,
            args.indices
        );
    }
    Ok(Verdict::from_bool(all))
}

fn action_name(action: Action) -> &'static str {
    match action {
        Action::Has => "has",
        Action::Enable => "enable",
        Action::Disable => "disable",
    }
}

fn combine_into<E: Entity>(
    id: E::Id,
    target: &SharedBackend,
    sources: &[SharedBackend],
    op: SetOp,
) -> Result<()> {
    let mut output = WithBackend::<E>::open(target.clone(), id, true)?;
    for source in sources {
        let input = WithBackend::<E>::open(source.clone(), id, false)?;
        output.combine(&input, op)?;
    }
    output.save()?;
    Ok(())
}

fn init_record<E: Entity>(id: E::Id, target: &SharedBackend) -> Result<()> {
    WithBackend::wrap(E::default(), target.clone(), id).save()?;
    Ok(())
}
