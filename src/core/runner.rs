use crate::types::{SnaphuError, SnaphuResult};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;

/// Runs the SNAPHU executable against a config file, teeing its output
#[derive(Debug, Clone)]
pub struct SnaphuRunner {
    executable: PathBuf,
    log_path: PathBuf,
}

impl SnaphuRunner {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(executable: P, log_path: Q) -> Self {
        Self {
            executable: executable.as_ref().to_path_buf(),
            log_path: log_path.as_ref().to_path_buf(),
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Run `<executable> -f <config>` to completion.
    ///
    /// Stdout and stderr are copied line by line into the log file and to
    /// the console while the tool runs. A non-zero exit is returned as
    /// `ToolFailed` carrying the captured log.
    pub fn run<P: AsRef<Path>>(&self, config: P) -> SnaphuResult<()> {
        let config = config.as_ref();
        let executable = self.executable.display().to_string();
        log::info!("Running: {} -f {}", executable, config.display());

        let mut child = Command::new(&self.executable)
            .arg("-f")
            .arg(config)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| SnaphuError::ToolLaunch {
                executable: executable.clone(),
                source,
            })?;

        let log = Mutex::new(File::create(&self.log_path)?);
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Both pipes are drained at once so neither can fill up and stall the child
        let (out_result, err_result) = std::thread::scope(|scope| {
            let out = scope.spawn(|| match stdout {
                Some(pipe) => tee_lines(pipe, &log, &mut io::stdout()),
                None => Ok(()),
            });
            let err = scope.spawn(|| match stderr {
                Some(pipe) => tee_lines(pipe, &log, &mut io::stderr()),
                None => Ok(()),
            });
            (join_tee(out), join_tee(err))
        });

        let status = child.wait()?;
        out_result?;
        err_result?;

        log::info!("{} finished with {}", executable, status);
        if !status.success() {
            let captured = std::fs::read_to_string(&self.log_path).unwrap_or_default();
            return Err(SnaphuError::ToolFailed {
                executable,
                status: status.to_string(),
                log: captured,
            });
        }
        Ok(())
    }
}

fn join_tee(handle: std::thread::ScopedJoinHandle<'_, io::Result<()>>) -> io::Result<()> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::new(io::ErrorKind::Other, "output reader panicked")))
}

/// Copy `pipe` line by line into the shared log and onto `console`
fn tee_lines<R: Read, W: Write>(pipe: R, log: &Mutex<File>, console: &mut W) -> io::Result<()> {
    let mut reader = BufReader::new(pipe);
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }
        {
            let mut file = log
                .lock()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
            file.write_all(&line)?;
        }
        console.write_all(&line)?;
        console.flush()?;
    }
}
