use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::StataBackend;

const SENTINEL: &str = "__stata_preproc_done__";

// Console-mode Stata reports failures as a bare `r(NNN);` line.
static RETURN_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^r\((\d+)\);?$").unwrap());

/// A console-mode Stata process driven over pipes.
///
/// Each `run` sends the command followed by a sentinel `display`; output is
/// collected until the sentinel line comes back, with `r(NNN);` lines folded
/// into the return code. One session equals one single-writer backend.
pub struct StataSession {
    _child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl StataSession {
    /// Spawn `program` (e.g. `stata`, `stata-mp`) in quiet console mode and
    /// synchronize on an init marker so startup noise never leaks into the
    /// first command's output.
    pub fn start(program: &str) -> io::Result<Self> {
        let mut child = Command::new(program)
            .arg("-q")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "no stdin"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "no stdout"))?;

        let mut session = Self {
            _child: child,
            stdin,
            stdout: BufReader::new(stdout),
        };

        session.send("display \"INITIALIZED\"")?;
        let mut line = String::new();
        loop {
            line.clear();
            if session.stdout.read_line(&mut line)? == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "Stata exited during startup",
                ));
            }
            if line.trim() == "INITIALIZED" {
                break;
            }
        }

        debug!(program, "Stata console session ready");
        Ok(session)
    }

    fn send(&mut self, text: &str) -> io::Result<()> {
        self.stdin.write_all(text.as_bytes())?;
        self.stdin.write_all(b"\n")?;
        self.stdin.flush()
    }
}

impl StataBackend for StataSession {
    fn run(&mut self, cmd: &str, quietly: bool) -> io::Result<(String, i32)> {
        debug!(quietly, "run: {}", cmd);

        self.send(cmd)?;
        self.send(&format!("display \"{}\"", SENTINEL))?;

        let mut output = String::new();
        let mut return_code = 0;

        loop {
            let mut line = String::new();
            if self.stdout.read_line(&mut line)? == 0 {
                warn!("Stata exited before sentinel; returning partial output");
                return Ok((output, return_code));
            }
            let trimmed = line.trim();

            if trimmed == SENTINEL {
                break;
            }
            // Skip the console's echo of our own input.
            if trimmed.starts_with(". ") || trimmed == "." {
                continue;
            }
            if let Some(caps) = RETURN_CODE_RE.captures(trimmed) {
                return_code = caps[1].parse().unwrap_or(1);
                continue;
            }
            if !trimmed.is_empty() {
                output.push_str(&line);
            }
        }

        if quietly {
            output.clear();
        }
        Ok((output, return_code))
    }

    fn count(&mut self) -> io::Result<u64> {
        let (out, rc) = self.run("display _N", false)?;
        if rc != 0 {
            return Err(io::Error::other(format!("display _N failed: r({})", rc)));
        }
        out.split_whitespace()
            .last()
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unparseable observation count: {:?}", out.trim()),
                )
            })
    }

    fn scratch_indicator(&mut self, condition: &str) -> io::Result<String> {
        let cmd = format!(
            "tempvar __selectionVar\n\
             quietly generate `__selectionVar' = cond({},1,0)\n\
             display \"`__selectionVar'\"",
            condition
        );
        let (out, rc) = self.run(&cmd, false)?;
        if rc != 0 {
            return Err(io::Error::other(format!(
                "failed to generate selection indicator: r({})",
                rc
            )));
        }
        let name = out.split_whitespace().last().unwrap_or("").to_string();
        if name.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "tempvar allocation returned no name",
            ));
        }
        Ok(name)
    }

    fn drop_var(&mut self, name: &str) -> io::Result<()> {
        // `capture` swallows the error when the variable never existed.
        self.run(&format!("capture drop {}", name), true).map(|_| ())
    }

    fn local_macro(&mut self, name: &str) -> io::Result<String> {
        let (out, _) = self.run(&format!("display \"`{}'\"", name), false)?;
        Ok(out.trim().to_string())
    }

    fn global_macro(&mut self, name: &str) -> io::Result<String> {
        let (out, _) = self.run(&format!("display \"${}\"", name), false)?;
        Ok(out.trim().to_string())
    }
}
