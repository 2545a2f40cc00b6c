use super::{ask, parse_yes_no};
use anyhow::{Result, anyhow};
use console::style;
use fireprofile_core::config::URL_PLACEHOLDER;
use fireprofile_core::{ConfigStore, Profile};
use std::io::{BufRead, Write};

const HELP: &str = "\
Commands:
  list            Show profiles and rules
  add-profile     Add a browser profile
  edit-profile    Change a profile's name or command
  delete-profile  Delete a profile and every rule using it
  add-rule        Route a domain pattern to a profile
  edit-rule       Route an existing pattern to another profile
  delete-rule     Remove a rule
  help            Show this help
  quit            Leave the editor

Patterns are an exact host (mail.example.com) or a wildcard for its
subdomains (*.example.com). Commands may contain %u where the URL goes;
without it the URL is appended.";

/// Interactive editor for profiles and rules
///
/// Every accepted edit is saved immediately. Failed edits print the error
/// and return to the prompt.
pub struct ConfigEditor<'a, R, W> {
    store: &'a mut ConfigStore,
    input: R,
    output: W,
}

/// Result of reading one field: a value, or the user bailed out
enum Field {
    Value(String),
    Cancelled,
}

impl<'a, R: BufRead, W: Write> ConfigEditor<'a, R, W> {
    pub fn new(store: &'a mut ConfigStore, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
        }
    }

    /// Run until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "{} {}",
            style("FireProfile configuration:").bold(),
            self.store.path().display()
        )?;
        self.list()?;
        writeln!(self.output, "Type 'help' for commands.")?;

        loop {
            let Some(command) = ask(&mut self.input, &mut self.output, "fireprofile> ")? else {
                return Ok(());
            };

            let result = match command.as_str() {
                "" => Ok(()),
                "list" | "ls" => self.list(),
                "add-profile" => self.add_profile(),
                "edit-profile" => self.edit_profile(),
                "delete-profile" => self.delete_profile(),
                "add-rule" => self.add_rule(),
                "edit-rule" => self.edit_rule(),
                "delete-rule" => self.delete_rule(),
                "help" | "?" => writeln!(self.output, "{}", HELP).map_err(anyhow::Error::from),
                "quit" | "exit" | "q" => return Ok(()),
                other => Err(anyhow!("Unknown command '{}'. Type 'help' for commands.", other)),
            };

            if let Err(e) = result {
                tracing::debug!("Edit failed: {:#}", e);
                writeln!(self.output, "{} {}", style("Error:").red().bold(), e)?;
            }
        }
    }

    fn list(&mut self) -> Result<()> {
        let config = self.store.config();

        writeln!(self.output, "\n{}", style("Profiles").bold().cyan())?;
        if config.profiles().next().is_none() {
            writeln!(self.output, "  (none)")?;
        }
        for profile in config.profiles() {
            writeln!(
                self.output,
                "  {:<16} {:<20} {}",
                profile.id,
                profile.name,
                profile.command_line()
            )?;
        }

        writeln!(self.output, "\n{}", style("Rules").bold().cyan())?;
        if config.rules().next().is_none() {
            writeln!(self.output, "  (none)")?;
        }
        for rule in config.rules() {
            writeln!(self.output, "  {:<32} -> {}", rule.pattern.to_string(), rule.profile_id)?;
        }
        writeln!(self.output)?;

        Ok(())
    }

    fn add_profile(&mut self) -> Result<()> {
        let Field::Value(name) = self.field("Display name: ")? else {
            return self.cancelled();
        };
        let suggested = slugify(&name);
        let Field::Value(id) = self.field(&format!("Profile id [{}]: ", suggested))? else {
            return self.cancelled();
        };
        let id = if id.is_empty() { suggested } else { id };

        let Field::Value(line) = self.field(&format!(
            "Command (e.g. firefox -P {} {}): ",
            id, URL_PLACEHOLDER
        ))?
        else {
            return self.cancelled();
        };
        let command = split_command(&line)?;

        self.store.add_profile(Profile::new(id.clone(), name, command))?;
        writeln!(self.output, "Added profile '{}'", id)?;
        Ok(())
    }

    fn edit_profile(&mut self) -> Result<()> {
        let profile = self.existing_profile()?;
        let Some(profile) = profile else {
            return self.cancelled();
        };

        let Field::Value(name) = self.field(&format!("Display name [{}]: ", profile.name))? else {
            return self.cancelled();
        };
        let Field::Value(line) =
            self.field(&format!("Command [{}]: ", profile.command_line()))?
        else {
            return self.cancelled();
        };

        let name = if name.is_empty() { profile.name.clone() } else { name };
        let command = if line.is_empty() {
            profile.command.clone()
        } else {
            split_command(&line)?
        };

        self.store.update_profile(&profile.id, name, command)?;
        writeln!(self.output, "Updated profile '{}'", profile.id)?;
        Ok(())
    }

    fn delete_profile(&mut self) -> Result<()> {
        let Some(profile) = self.existing_profile()? else {
            return self.cancelled();
        };

        let affected = self.store.config().rules_for(&profile.id).count();
        let question = format!(
            "Delete profile '{}' and {} rule(s) using it? [y/N]: ",
            profile.id, affected
        );
        if !self.confirm(&question)? {
            return self.cancelled();
        }

        let removed = self.store.remove_profile(&profile.id)?;
        writeln!(
            self.output,
            "Deleted profile '{}' and {} rule(s)",
            profile.id,
            removed.len()
        )?;
        Ok(())
    }

    fn add_rule(&mut self) -> Result<()> {
        let Field::Value(pattern) = self.field("Pattern (example.com or *.example.com): ")? else {
            return self.cancelled();
        };
        let Field::Value(profile_id) = self.field("Profile id: ")? else {
            return self.cancelled();
        };

        let rule = self.store.add_rule(&pattern, &profile_id).map_err(|e| match e {
            fireprofile_core::Error::AmbiguousRule { .. } => {
                anyhow!("{}. Use 'edit-rule' to re-route it.", e)
            }
            other => other.into(),
        })?;
        writeln!(self.output, "Added rule {} -> {}", rule.pattern, rule.profile_id)?;
        Ok(())
    }

    fn edit_rule(&mut self) -> Result<()> {
        let Field::Value(pattern) = self.field("Pattern: ")? else {
            return self.cancelled();
        };
        let current = self
            .store
            .config()
            .rule(&pattern)
            .cloned()
            .ok_or_else(|| anyhow!("No rule for '{}'", pattern))?;

        let Field::Value(profile_id) =
            self.field(&format!("Profile id [{}]: ", current.profile_id))?
        else {
            return self.cancelled();
        };
        let profile_id = if profile_id.is_empty() {
            current.profile_id
        } else {
            profile_id
        };

        self.store.set_rule(&pattern, &profile_id)?;
        writeln!(self.output, "Rule {} -> {}", current.pattern, profile_id)?;
        Ok(())
    }

    fn delete_rule(&mut self) -> Result<()> {
        let Field::Value(pattern) = self.field("Pattern: ")? else {
            return self.cancelled();
        };
        if self.store.config().rule(&pattern).is_none() {
            return Err(anyhow!("No rule for '{}'", pattern));
        }
        if !self.confirm(&format!("Delete rule for '{}'? [y/N]: ", pattern))? {
            return self.cancelled();
        }

        let rule = self.store.remove_rule(&pattern)?;
        writeln!(self.output, "Deleted rule {}", rule.pattern)?;
        Ok(())
    }

    /// Ask for a profile id and look it up; `None` if the user bailed out
    fn existing_profile(&mut self) -> Result<Option<Profile>> {
        let Field::Value(id) = self.field("Profile id: ")? else {
            return Ok(None);
        };
        self.store
            .config()
            .profile(&id)
            .cloned()
            .map(Some)
            .ok_or_else(|| anyhow!("Profile '{}' not found", id))
    }

    fn field(&mut self, label: &str) -> Result<Field> {
        Ok(match ask(&mut self.input, &mut self.output, label)? {
            Some(value) => Field::Value(value),
            None => Field::Cancelled,
        })
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        loop {
            let Field::Value(answer) = self.field(question)? else {
                return Ok(false);
            };
            if let Some(yes) = parse_yes_no(&answer, false) {
                return Ok(yes);
            }
        }
    }

    fn cancelled(&mut self) -> Result<()> {
        writeln!(self.output, "Cancelled.")?;
        Ok(())
    }
}

/// Split a shell-style command line into argument tokens
fn split_command(line: &str) -> Result<Vec<String>> {
    let tokens = shlex::split(line).ok_or_else(|| anyhow!("Unterminated quote in command"))?;
    if tokens.is_empty() {
        return Err(anyhow!("Command cannot be empty"));
    }
    Ok(tokens)
}

/// Lowercase id suggestion derived from a display name
fn slugify(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    slug.split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
