use crate::backend::{parse_ispell_output, Backend, BackendKind, BackendSettings, Verdict};
use crate::error::{BackendError, BackendResult};
use std::cell::{OnceCell, RefCell};
use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

/// aspell or hunspell kept running in ispell `-a` mode.
///
/// The child is started on the first request and reused until it fails,
/// then restarted on the next one.
pub struct ProcessBackend {
    kind: BackendKind,
    program: String,
    args: Vec<String>,
    available: OnceCell<bool>,
    session: RefCell<Option<Session>>,
}

/// One running child and its pipes.
struct Session {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl Session {
    fn start(program: &str, args: &[String]) -> BackendResult<Self> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| BackendError::Unavailable {
                program: program.to_string(),
                source,
            })?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, BufReader::new(stdout)),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(io::Error::other("backend pipes were not captured").into());
            }
        };

        let mut session = Self {
            child,
            stdin,
            stdout,
        };
        // Version banner.
        let mut banner = String::new();
        session.read_line(program, &mut banner)?;
        Ok(session)
    }

    /// Send one line and collect the answer, which ends with an empty line.
    fn request(&mut self, program: &str, text: &str) -> BackendResult<String> {
        // `^` keeps the line from being read as an ispell command.
        writeln!(self.stdin, "^{}", text.replace(['\n', '\r'], " "))?;
        self.stdin.flush()?;

        let mut output = String::new();
        loop {
            let mut line = String::new();
            self.read_line(program, &mut line)?;
            if line.trim_end_matches(['\n', '\r']).is_empty() {
                return Ok(output);
            }
            output.push_str(&line);
        }
    }

    fn read_line(&mut self, program: &str, line: &mut String) -> BackendResult<()> {
        if self.stdout.read_line(line)? == 0 {
            let status = self.child.wait()?;
            return Err(BackendError::Failed {
                program: program.to_string(),
                status,
            });
        }
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl ProcessBackend {
    pub fn new(settings: &BackendSettings) -> Self {
        let kind = settings.kind;
        let program = settings
            .program
            .clone()
            .unwrap_or_else(|| match kind {
                BackendKind::Hunspell => "hunspell".to_string(),
                _ => "aspell".to_string(),
            });

        let mut args = match kind {
            BackendKind::Hunspell => vec![
                "-a".to_string(),
                "-d".to_string(),
                settings.language.clone(),
            ],
            _ => vec!["pipe".to_string(), format!("--lang={}", settings.language)],
        };
        args.extend(settings.extra_args.iter().cloned());

        Self {
            kind,
            program,
            args,
            available: OnceCell::new(),
            session: RefCell::new(None),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn run(&self, text: &str) -> BackendResult<String> {
        let mut slot = self.session.borrow_mut();
        let mut session = match slot.take() {
            Some(session) => session,
            None => {
                log::debug!("starting {} {}", self.program, self.args.join(" "));
                Session::start(&self.program, &self.args)?
            }
        };

        let output = session.request(&self.program, text)?;
        *slot = Some(session);
        Ok(output)
    }
}

impl Backend for ProcessBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn is_available(&self) -> bool {
        *self.available.get_or_init(|| {
            let ok = Command::new(&self.program)
                .arg("-v")
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|status| status.success())
                .unwrap_or(false);
            if !ok {
                log::debug!("backend program `{}` is not usable", self.program);
            }
            ok
        })
    }

    fn check(&self, text: &str) -> BackendResult<Vec<Verdict>> {
        let output = self.run(text)?;
        Ok(parse_ispell_output(&output))
    }
}
