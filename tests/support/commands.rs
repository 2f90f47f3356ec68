//! Command helper methods for Test.

use std::process::Output;

use assert_cmd::Command;

use super::Test;

impl Test {
    /// A `secreg` command running inside the target directory.
    ///
    /// Colors and the log filter variable are cleared so output is stable.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_secreg"));
        cmd.current_dir(self.dir.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("SECREG_LOG");
        cmd
    }

    /// Shortcut for `secreg build` with extra arguments.
    pub fn build(&self, args: &[&str]) -> Output {
        self.cmd()
            .arg("build")
            .args(args)
            .output()
            .expect("failed to run secreg build")
    }

    /// `secreg build` with environment variables set.
    pub fn build_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> Output {
        let mut cmd = self.cmd();
        cmd.arg("build").args(args);
        for (k, v) in env {
            cmd.env(k, v);
        }
        cmd.output().expect("failed to run secreg build")
    }

    /// Shortcut for `secreg show` with extra arguments.
    pub fn show(&self, args: &[&str]) -> Output {
        self.cmd()
            .arg("show")
            .args(args)
            .output()
            .expect("failed to run secreg show")
    }

    /// Shortcut for `secreg keygen` with extra arguments.
    pub fn keygen(&self, args: &[&str]) -> Output {
        self.cmd()
            .arg("keygen")
            .args(args)
            .output()
            .expect("failed to run secreg keygen")
    }
}
