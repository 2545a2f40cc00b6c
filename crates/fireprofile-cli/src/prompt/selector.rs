use super::{ask, parse_yes_no};
use console::style;
use fireprofile_core::{Profile, ProfileSelector, Selection};
use std::io::{self, BufRead, StdinLock, Stderr, Write};

/// Numbered profile picker for hosts without a rule
///
/// Prompts go to `output` so that stdout stays free for command output.
/// End of input or `q` cancels.
pub struct TerminalSelector<R, W> {
    input: R,
    output: W,
}

impl TerminalSelector<StdinLock<'static>, Stderr> {
    /// Selector reading stdin and prompting on stderr
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalSelector<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn choose_profile(&mut self, profiles: &[&Profile]) -> io::Result<Option<String>> {
        let label = format!("Profile [1-{}, q to cancel]: ", profiles.len());

        loop {
            let Some(answer) = ask(&mut self.input, &mut self.output, &label)? else {
                return Ok(None);
            };

            if matches!(answer.to_lowercase().as_str(), "q" | "quit") {
                return Ok(None);
            }

            // An exact id wins over a list position, so numeric ids stay reachable
            let by_id = profiles.iter().find(|profile| profile.id == answer);
            let by_number = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|index| profiles.get(index));

            match by_id.or(by_number) {
                Some(profile) => return Ok(Some(profile.id.clone())),
                None => writeln!(
                    self.output,
                    "{} enter a number between 1 and {} or a profile id",
                    style("Invalid choice:").yellow().for_stderr(),
                    profiles.len()
                )?,
            }
        }
    }

    fn ask_remember(&mut self, host: &str) -> io::Result<bool> {
        let label = format!("Remember this choice for {}? [Y/n]: ", host);

        loop {
            // End of input keeps the default, like the pre-checked box it replaces
            let Some(answer) = ask(&mut self.input, &mut self.output, &label)? else {
                return Ok(true);
            };
            match parse_yes_no(&answer, true) {
                Some(remember) => return Ok(remember),
                None => writeln!(self.output, "Please answer y or n")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> ProfileSelector for TerminalSelector<R, W> {
    fn prompt_for_profile(
        &mut self,
        host: &str,
        profiles: &[&Profile],
    ) -> fireprofile_core::Result<Selection> {
        writeln!(
            self.output,
            "\nNo rule for {}. Open it with which profile?",
            style(host).bold().cyan().for_stderr()
        )?;

        let width = profiles.iter().map(|p| p.name.len()).max().unwrap_or(0);
        for (index, profile) in profiles.iter().enumerate() {
            writeln!(
                self.output,
                "  {}) {:<width$}  {}",
                index + 1,
                profile.name,
                style(profile.command_line()).dim().for_stderr(),
                width = width
            )?;
        }

        let Some(profile_id) = self.choose_profile(profiles)? else {
            return Ok(Selection::Cancelled);
        };
        let remember = self.ask_remember(host)?;

        Ok(Selection::Chosen {
            profile_id,
            remember,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn profiles() -> Vec<Profile> {
        vec![
            Profile::new("work", "Work", vec!["firefox".into(), "-P".into(), "work".into()]),
            Profile::new("home", "Home", vec!["firefox".into(), "-P".into(), "home".into()]),
        ]
    }

    fn run(script: &str) -> (Selection, String) {
        run_with(&profiles(), script)
    }

    fn run_with(profiles: &[Profile], script: &str) -> (Selection, String) {
        let refs: Vec<&Profile> = profiles.iter().collect();
        let mut output = Vec::new();

        let selection = TerminalSelector::new(Cursor::new(script.to_string()), &mut output)
            .prompt_for_profile("new.com", &refs)
            .unwrap();

        (selection, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_choose_by_number_and_remember() {
        let (selection, output) = run("2\ny\n");
        assert_eq!(
            selection,
            Selection::Chosen {
                profile_id: "home".to_string(),
                remember: true
            }
        );
        assert!(output.contains("new.com"));
        assert!(output.contains("1) Work"));
        assert!(output.contains("2) Home"));
    }

    #[test]
    fn test_choose_by_id_without_remembering() {
        let (selection, _) = run("work\nn\n");
        assert_eq!(
            selection,
            Selection::Chosen {
                profile_id: "work".to_string(),
                remember: false
            }
        );
    }

    #[test]
    fn test_remember_defaults_to_yes() {
        let (selection, _) = run("1\n\n");
        assert!(matches!(selection, Selection::Chosen { remember: true, .. }));
    }

    #[test]
    fn test_invalid_choice_reprompts() {
        let (selection, output) = run("7\nfoo\n1\nno\n");
        assert_eq!(
            selection,
            Selection::Chosen {
                profile_id: "work".to_string(),
                remember: false
            }
        );
        assert_eq!(output.matches("Invalid choice").count(), 2);
    }

    #[test]
    fn test_quit_and_eof_cancel() {
        assert_eq!(run("q\n").0, Selection::Cancelled);
        assert_eq!(run("").0, Selection::Cancelled);
    }

    #[test]
    fn test_numeric_id_beats_position() {
        let profiles = vec![
            Profile::new("2", "Second", vec!["firefox".into(), "-P".into(), "2".into()]),
            Profile::new("9", "Ninth", vec!["firefox".into(), "-P".into(), "9".into()]),
        ];

        let (selection, _) = run_with(&profiles, "2\nn\n");
        assert_eq!(
            selection,
            Selection::Chosen {
                profile_id: "2".to_string(),
                remember: false
            }
        );

        // Positions still work when no id matches
        let (selection, _) = run_with(&profiles, "1\nn\n");
        assert!(matches!(selection, Selection::Chosen { ref profile_id, .. } if profile_id == "2"));
    }

    struct BrokenInput;

    impl io::Read for BrokenInput {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("terminal went away"))
        }
    }

    #[test]
    fn test_read_failure_is_not_reported_as_config_error() {
        let profiles = profiles();
        let refs: Vec<&Profile> = profiles.iter().collect();

        let err = TerminalSelector::new(io::BufReader::new(BrokenInput), Vec::new())
            .prompt_for_profile("new.com", &refs)
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("terminal went away"));
        assert!(!message.contains("config"));
    }
}
