use atomconv_core::domain::Dialect;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub(super) struct ConverterCommandSpec {
    pub(super) command: &'static str,
    pub(super) dialect: Dialect,
    pub(super) usage: &'static str,
}

const GROTRIAN_FILTER_HELP: &str = "\
Exclude levels/configurations from the diagram which have
energy >= e, principal quantum number >= n, angular momentum qn >= l
or which have a certain configuration i.e. 3Po or 4Se
";

pub(super) const CONVERTER_COMMANDS: [ConverterCommandSpec; 5] = [
    ConverterCommandSpec {
        command: "adamant-to-toss",
        dialect: Dialect::Adamant,
        usage: "Usage: adamant_to_toss <level-file> <line-file>\n",
    },
    ConverterCommandSpec {
        command: "nist-to-toss",
        dialect: Dialect::Nist,
        usage: "Usage: nist_to_toss <nist-file>\n",
    },
    ConverterCommandSpec {
        command: "tmad-to-grotrian",
        dialect: Dialect::Tmad,
        usage: "\nUsage: tmad_to_grotrian <TMAD file> <options>\n\n\
                Options: e=<number>, n=<number>, l=<number>, c=<Term><parity>\n",
    },
    ConverterCommandSpec {
        command: "toss-to-grotrian",
        dialect: Dialect::Toss,
        usage: "\nUsage: toss_to_grotrian <levels file> <ionlimit> <options>\n\n\
                Options: lf=<file>, e=<number>, n=<number>, l=<number>, c=<Term><parity>, off=<number>\n\
                lf adds a file with transitions, expected to be in TOSS format\n",
    },
    ConverterCommandSpec {
        command: "toss-to-fplot",
        dialect: Dialect::TossFplot,
        usage: "Transforms lines in TOSS format (wvl+log gf) into\n\
                WRPLOT idents to use in a f over lambda plot\n\
                ------------------------------------------------\n\
                Usage: toss_to_fplot <filename> <scalefactor=1.0> <u=false>\n",
    },
];

pub(super) fn converter_command_spec(command: &str) -> Option<ConverterCommandSpec> {
    CONVERTER_COMMANDS
        .iter()
        .copied()
        .find(|spec| spec.command == command)
}

/// Usage text printed when a converter is started without its required arguments.
pub(super) fn legacy_usage(spec: ConverterCommandSpec) -> String {
    match spec.dialect {
        Dialect::Tmad | Dialect::Toss => format!("{}{GROTRIAN_FILTER_HELP}", spec.usage),
        _ => spec.usage.to_string(),
    }
}

/// Maps the name the binary was started under to a subcommand, so that links
/// named after the standalone converters keep working.
pub(super) fn command_alias_from_program_name(program_name: &str) -> Option<&'static str> {
    let executable_name = Path::new(program_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(program_name);
    let normalized = executable_name
        .strip_suffix(".exe")
        .unwrap_or(executable_name);

    if normalized == "atomconv" {
        return None;
    }

    CONVERTER_COMMANDS
        .iter()
        .find(|spec| {
            spec.dialect.legacy_program() == normalized || spec.command == normalized
        })
        .map(|spec| spec.command)
}
