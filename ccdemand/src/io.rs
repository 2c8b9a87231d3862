use clap::Args;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write, stdin, stdout},
    path::PathBuf,
    str::FromStr,
};

// Subcommands that consume a file and produce output share this struct.
#[derive(Args)]
pub struct IOArgs {
    /// The input file ("-" implies stdin)
    #[arg(default_value = "-", value_parser = clap::value_parser!(PathOrStd))]
    input: PathOrStd,

    /// The output file ("-" implies stdout)
    #[arg(short, long, default_value = "-", value_parser = clap::value_parser!(PathOrStd))]
    output: PathOrStd,
}

impl IOArgs {
    pub fn read(&self) -> anyhow::Result<Box<dyn Read>> {
        match &self.input {
            PathOrStd::Path(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
            PathOrStd::Std => Ok(Box::new(stdin().lock())),
        }
    }

    pub fn write(&self) -> anyhow::Result<Box<dyn Write>> {
        self.output.write()
    }
}

// Subcommands that only produce output.
#[derive(Args)]
pub struct OutputArgs {
    /// The output file ("-" implies stdout)
    #[arg(short, long, default_value = "-", value_parser = clap::value_parser!(PathOrStd))]
    output: PathOrStd,
}

impl OutputArgs {
    pub fn write(&self) -> anyhow::Result<Box<dyn Write>> {
        self.output.write()
    }
}

#[derive(Clone)]
enum PathOrStd {
    Path(PathBuf),
    Std,
}

impl PathOrStd {
    fn write(&self) -> anyhow::Result<Box<dyn Write>> {
        match self {
            PathOrStd::Path(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
            PathOrStd::Std => Ok(Box::new(stdout().lock())),
        }
    }
}

impl FromStr for PathOrStd {
    type Err = <PathBuf as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(Self::Std)
        } else {
            Ok(Self::Path(s.parse()?))
        }
    }
}
