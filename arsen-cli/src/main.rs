use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use arsen_analysis::{BinaryService, Config, Event, EventBus};
use arsen_ir::{Address, Architecture};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "arsen", about = "Multi-architecture binary analysis toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LoadArgs {
    /// Path to the flat binary image
    input: PathBuf,
    /// Instruction set: x86, x86_64, arm, arm64, mips, powerpc
    #[arg(long, default_value = "x86_64")]
    arch: String,
    /// Load address of the image (hex accepted)
    #[arg(long, default_value = "0x1000", value_parser = parse_u64)]
    base: u64,
    /// Entry point (defaults to the load address)
    #[arg(long, value_parser = parse_u64)]
    entry: Option<u64>,
    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show image layout and section table
    Info(LoadArgs),
    /// Linear disassembly listing of the executable sections
    Disasm(LoadArgs),
    /// Run the full analysis pipeline and print a summary
    Analyze {
        #[command(flatten)]
        load: LoadArgs,
        /// Emit the full analysis result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print pseudocode for detected functions
    Decompile {
        #[command(flatten)]
        load: LoadArgs,
        /// Only this function (start address, hex accepted)
        #[arg(long, value_parser = parse_u64)]
        function: Option<u64>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Info(load) => cmd_info(&load),
        Commands::Disasm(load) => cmd_disasm(&load),
        Commands::Analyze { load, json } => cmd_analyze(&load, json),
        Commands::Decompile { load, function } => cmd_decompile(&load, function.map(Address)),
    }
}

fn parse_u64(text: &str) -> Result<u64, String> {
    let trimmed = text.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };
    parsed.map_err(|e| format!("invalid address {trimmed:?}: {e}"))
}

fn parse_arch(name: &str) -> Architecture {
    match name.to_ascii_lowercase().as_str() {
        "x86" | "i386" => Architecture::X86,
        "x86_64" | "x64" | "amd64" => Architecture::X86_64,
        "arm" => Architecture::Arm,
        "arm64" | "aarch64" => Architecture::Arm64,
        "mips" => Architecture::Mips,
        "powerpc" | "ppc" => Architecture::PowerPc,
        _ => Architecture::Unknown,
    }
}

fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => Config::default(),
    }
}

fn open_service(load: &LoadArgs) -> (BinaryService, Arc<arsen_file::BinaryFile>) {
    let config = load_config(load.config.as_deref());
    let events = Arc::new(EventBus::new());
    events.subscribe(|event| {
        if let Event::AnalysisProgress { percent } = event {
            log::info!("analysis {percent}%");
        }
    });
    let service = match BinaryService::new(events, &config) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let arch = parse_arch(&load.arch);
    let binary = match service.load_binary(&load.input, arch, load.base, load.entry) {
        Ok(binary) => binary,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    (service, binary)
}

fn cmd_info(load: &LoadArgs) {
    let (_, binary) = open_service(load);
    println!("=== Binary Info ===");
    println!("Path:         {}", binary.path.display());
    println!("Format:       {:?}", binary.format);
    println!("Architecture: {}", binary.architecture);
    println!("Endianness:   {:?}", binary.endianness);
    println!("Bitness:      {}", binary.bitness);
    println!("Entry point:  {}", binary.entry_point);
    println!();
    println!("Sections:");
    for section in &binary.sections {
        println!(
            "  {:<10} {} size {:#x} [{}{}{}]",
            section.name,
            section.virtual_address,
            section.virtual_size,
            if section.is_readable() { "r" } else { "-" },
            if section.is_writable() { "w" } else { "-" },
            if section.is_executable() { "x" } else { "-" },
        );
    }
}

fn cmd_disasm(load: &LoadArgs) {
    let (_, binary) = open_service(load);
    let disassembler = match arsen_disasm::for_architecture(binary.architecture) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    for section in &binary.sections {
        if !section.is_executable() {
            continue;
        }
        println!("# Section {}", section.name);
        let mut offset = 0usize;
        while offset < section.data.len() {
            let address = section.virtual_address.add(offset as i64);
            let insn = disassembler.disassemble(address, &section.data, offset);
            println!("{address}  {:<12} {}", insn.bytes_hex(), insn.full_text());
            offset += insn.size.max(1) as usize;
        }
    }
}

fn cmd_analyze(load: &LoadArgs, json: bool) {
    let (service, _) = open_service(load);
    let result = match service.analyze_blocking() {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(result.as_ref()) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!("=== Analysis Summary ===");
    println!("Instructions:     {}", result.instructions.len());
    println!("Functions:        {}", result.functions.len());
    println!("Cross-references: {}", result.cross_references.len());
    println!("Strings:          {}", result.strings.len());
    println!();
    for function in result.functions.values() {
        println!(
            "{}  size {:#x}  blocks {}  callers {}",
            function.name,
            function.size,
            function.basic_blocks.len(),
            function.callers.len(),
        );
    }
    if !result.strings.is_empty() {
        println!();
        println!("Strings:");
        for string in &result.strings {
            println!("  {string:?}");
        }
    }
}

fn cmd_decompile(load: &LoadArgs, function: Option<Address>) {
    let (service, _) = open_service(load);
    let result = match service.analyze_blocking() {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let targets: Vec<Address> = match function {
        Some(address) => vec![address],
        None => result.functions.keys().copied().collect(),
    };
    for address in targets {
        match service.pseudocode_for(address) {
            Ok(text) => {
                println!("// {address}");
                println!("{text}");
                println!();
            }
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }
}
