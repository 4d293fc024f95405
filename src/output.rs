use std::io::{self, Write};

use serde::Serialize;

use crate::manager::DownloadReport;
use crate::registry::{GenomeRecord, RegistrySummary};

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_download(result: &DownloadReport) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_list(result: &RegistrySummary) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_record(result: &GenomeRecord) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}
