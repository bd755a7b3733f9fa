//! Interactive menu shell.
//!
//! # Responsibility
//! - Render the text menu and prompts, and forward answers to the planner.
//! - Re-prompt on invalid input with a bounded number of attempts.
//!
//! # Invariants
//! - Invalid input never aborts the session; it returns to the menu at worst.
//! - End of input ends the session cleanly.

use codeplans_core::{
    core_version, validate_day, validate_time, validate_title, EventEdit, EventId, IdSource,
    PlannerError, PlannerService, RandomIdSource, StoreError, ValidationError, Weekday,
};
use log::{debug, info};
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

/// Invalid answers accepted per prompt before returning to the menu.
pub const MAX_PROMPT_ATTEMPTS: usize = 5;

const BANNER_BARS: [&str; 3] = [
    "=--=--=--=--=--=--=--=--=--=--=--=--=--=",
    "-=--=--=--=--=--=--=--=--=--=--=--=--=--",
    "--=--=--=--=--=--=--=--=--=--=--=--=--=-",
];
const BANNER_FRAMES: usize = 12;
const BANNER_FRAME_DELAY: Duration = Duration::from_millis(200);

const MENU_OPTIONS: [&str; 9] = [
    "1) Load plans from savefile",
    "2) Add an event to your plans",
    "3) Edit an event",
    "4) Show plans for a day",
    "5) Show all events for all days",
    "6) Save all plans",
    "7) Download an example plan",
    "8) Where am I?",
    "9) Exit CodePlans",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub example_url: String,
    /// Emit ANSI clear-screen sequences between screens.
    pub clear_screen: bool,
    /// Play the welcome banner on start.
    pub welcome: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditChoice {
    Day,
    StartTime,
    EndTime,
    Title,
    Delete,
    Exit,
}

impl EditChoice {
    fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "1" => Some(Self::Day),
            "2" => Some(Self::StartTime),
            "3" => Some(Self::EndTime),
            "4" => Some(Self::Title),
            "5" => Some(Self::Delete),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Text shell over any line reader and writer.
pub struct Shell<R, W, I = RandomIdSource> {
    input: R,
    output: W,
    planner: PlannerService<I>,
    config: ShellConfig,
}

impl<R: BufRead, W: Write, I: IdSource> Shell<R, W, I> {
    pub fn new(input: R, output: W, planner: PlannerService<I>, config: ShellConfig) -> Self {
        Self {
            input,
            output,
            planner,
            config,
        }
    }

    /// Ends the shell and hands back the planner session.
    pub fn into_planner(self) -> PlannerService<I> {
        self.planner
    }

    /// Runs the menu loop until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        info!(
            "event=shell_start module=cli status=ok workdir={}",
            self.planner.files().workdir().display()
        );
        if self.config.welcome {
            self.show_welcome()?;
        }
        if self.planner.has_saved_plans() {
            self.offer_saved_plans()?;
        }

        while self.menu_round()? == Flow::Continue {}

        writeln!(self.output, "Bye!")?;
        self.output.flush()?;
        info!("event=shell_exit module=cli status=ok");
        Ok(())
    }

    fn menu_round(&mut self) -> io::Result<Flow> {
        self.clear()?;
        writeln!(self.output, "------------ MAIN MENU ------------")?;
        for option in MENU_OPTIONS {
            writeln!(self.output, "{option}")?;
        }
        write!(self.output, "Choose option: ")?;
        let Some(choice) = self.read_line()? else {
            return Ok(Flow::Exit);
        };
        let choice = choice.trim().to_lowercase();
        debug!("event=menu_select module=cli option={choice}");
        self.clear()?;

        match choice.as_str() {
            "1" => self.load_plans(true)?,
            "2" => self.add_event()?,
            "3" => self.edit_event()?,
            "4" => self.show_day()?,
            "5" => self.show_week()?,
            "6" => self.save_plans()?,
            "7" => self.download_example()?,
            "8" => self.show_workdir()?,
            "9" | "exit" => return Ok(Flow::Exit),
            other => writeln!(
                self.output,
                "\"{other}\" is not listed as an option. \
                 Please type the digit in front of the menu option you want. For example '3'"
            )?,
        }
        Ok(Flow::Continue)
    }

    fn show_welcome(&mut self) -> io::Result<()> {
        for frame in 0..BANNER_FRAMES {
            self.clear()?;
            let bar = BANNER_BARS[frame % BANNER_BARS.len()];
            writeln!(self.output, "{bar}")?;
            writeln!(self.output, "      Welcome to CodePlans {}", core_version())?;
            writeln!(self.output)?;
            writeln!(self.output, "{bar}")?;
            self.output.flush()?;
            thread::sleep(BANNER_FRAME_DELAY);
        }
        self.clear()
    }

    fn offer_saved_plans(&mut self) -> io::Result<()> {
        let answer = self.prompt_until(
            "CodePlans automatically found some saved plans.\nWould you like to load them? (y/n)",
            |line| match line.trim() {
                "y" => Ok(true),
                "n" => Ok(false),
                _ => Err("Please type either y or n.".to_string()),
            },
        )?;
        match answer {
            Some(true) => {
                self.planner.select_file("").map_err(to_io_error)?;
                self.load_plans(false)
            }
            Some(false) => writeln!(self.output, "Okay. No problem!"),
            None => Ok(()),
        }
    }

    fn load_plans(&mut self, ask_for_name: bool) -> io::Result<()> {
        if ask_for_name && !self.ask_for_file_name()? {
            return Ok(());
        }
        match self.planner.load() {
            Ok(count) => writeln!(self.output, "Plans loaded! ({count} events)"),
            Err(err) => writeln!(
                self.output,
                "Could not load the plans file '{}'. Does the program have reading \
                 permission to this directory, and does the file exist? ({err})",
                self.planner.active_path().display()
            ),
        }
    }

    fn add_event(&mut self) -> io::Result<()> {
        let Some(day) = self.ask_day("Which day would you like to add an event to?")? else {
            return Ok(());
        };
        let Some(start) = self.ask_time("When does the event start? (e.g. 13:30)")? else {
            return Ok(());
        };
        let Some(end) = self.ask_time("When does the event end? (e.g. 15:30)")? else {
            return Ok(());
        };
        let Some(title) = self.prompt_until("What is the title of the event?", |line| {
            validate_title(line)
                .map(|()| line.to_string())
                .map_err(|_| "The title cannot be empty.".to_string())
        })?
        else {
            return Ok(());
        };

        match self
            .planner
            .store_mut()
            .add_event(day.as_str(), &start, &end, &title)
        {
            Ok(id) => writeln!(self.output, "Plan added! (EventID {id})"),
            Err(err) => writeln!(self.output, "Could not add the event: {err}"),
        }
    }

    fn edit_event(&mut self) -> io::Result<()> {
        let Some(day) = self.ask_day("What day would you like to edit?")? else {
            return Ok(());
        };
        if self.planner.store().events_on(day).is_empty() {
            writeln!(self.output, "{day} has no plans")?;
            return self.pause();
        }
        let Some(id) = self.ask_event_id(day)? else {
            return Ok(());
        };
        self.clear()?;

        let Some(choice) = self.ask_edit_choice(day, &id)? else {
            return Ok(());
        };
        match choice {
            EditChoice::Day => {
                let Some(new_day) = self.ask_day("Please type in a new day")? else {
                    return Ok(());
                };
                let result = self.apply_edit(day, &id, EventEdit::Day(new_day.to_string()));
                match result {
                    Ok(()) => writeln!(
                        self.output,
                        "Successfully moved event from {day} to {new_day}"
                    )?,
                    Err(err) => writeln!(self.output, "Could not move event: {err}")?,
                }
            }
            EditChoice::StartTime => {
                let Some(time) =
                    self.ask_time("Please type in a new start time (e.g. 15:30):")?
                else {
                    return Ok(());
                };
                match self.apply_edit(day, &id, EventEdit::StartTime(time)) {
                    Ok(()) => writeln!(self.output, "Start time successfully changed!")?,
                    Err(err) => writeln!(self.output, "Could not edit event: {err}")?,
                }
            }
            EditChoice::EndTime => {
                let Some(time) = self.ask_time("Please type in a new end time (e.g. 15:30):")?
                else {
                    return Ok(());
                };
                match self.apply_edit(day, &id, EventEdit::EndTime(time)) {
                    Ok(()) => writeln!(self.output, "End time successfully changed!")?,
                    Err(err) => writeln!(self.output, "Could not edit event: {err}")?,
                }
            }
            EditChoice::Title => {
                writeln!(self.output, "Please type in a new title: ")?;
                let Some(title) = self.read_line()? else {
                    return Ok(());
                };
                match self.apply_edit(day, &id, EventEdit::Title(title)) {
                    Ok(()) => writeln!(self.output, "Event edited successfully!")?,
                    Err(StoreError::Validation(ValidationError::EmptyTitle)) => {
                        writeln!(self.output, "Could not edit event. No title provided")?
                    }
                    Err(err) => writeln!(self.output, "Could not edit event: {err}")?,
                }
            }
            EditChoice::Delete => {
                let summary = self.event_summary(day, &id);
                writeln!(self.output, "Are you sure you want to delete this event (y/n):")?;
                writeln!(self.output, "{summary}")?;
                let Some(answer) = self.read_line()? else {
                    return Ok(());
                };
                if answer.trim() != "y" {
                    writeln!(self.output, "No worries! Nothing was deleted")?;
                    return self.pause();
                }
                match self.apply_edit(day, &id, EventEdit::Delete) {
                    Ok(()) => writeln!(self.output, "Successfully deleted event!")?,
                    Err(err) => writeln!(self.output, "Could not delete event: {err}")?,
                }
            }
            EditChoice::Exit => return Ok(()),
        }
        self.pause()
    }

    fn apply_edit(
        &mut self,
        day: Weekday,
        id: &EventId,
        edit: EventEdit,
    ) -> Result<(), StoreError> {
        self.planner.store_mut().edit_event(day.as_str(), id, edit)
    }

    fn ask_event_id(&mut self, day: Weekday) -> io::Result<Option<EventId>> {
        for _ in 0..MAX_PROMPT_ATTEMPTS {
            writeln!(self.output, "-----------------------------------")?;
            self.print_day(day, true)?;
            writeln!(self.output)?;
            writeln!(
                self.output,
                "Please type the EventID of the event you would like to edit (e.g. 'K0U7KP'):"
            )?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if let Some(id) = EventId::from_user_input(&line) {
                if self.planner.store().get_event(day.as_str(), &id).is_ok() {
                    return Ok(Some(id));
                }
            }
            writeln!(
                self.output,
                "Could not find an event with id: {}",
                line.trim().to_uppercase()
            )?;
        }
        self.give_up()
    }

    fn ask_edit_choice(&mut self, day: Weekday, id: &EventId) -> io::Result<Option<EditChoice>> {
        let summary = self.event_summary(day, id);
        let menu = format!(
            "Now editing: {summary}\n\
             -----------------------------------\n\
             What would you like to change?\n\
             1) Day\n2) Start time\n3) End time\n4) Title\n5) Delete event\n6) Exit"
        );
        self.prompt_until(&menu, |line| {
            EditChoice::parse(line).ok_or_else(|| format!("{line} is not an option in the menu!"))
        })
    }

    fn event_summary(&self, day: Weekday, id: &EventId) -> String {
        self.planner
            .store()
            .get_event(day.as_str(), id)
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    fn show_day(&mut self) -> io::Result<()> {
        let Some(day) = self.ask_day("What day would you like to see?")? else {
            return Ok(());
        };
        self.print_day(day, false)?;
        self.pause()
    }

    fn print_day(&mut self, day: Weekday, with_ids: bool) -> io::Result<()> {
        let lines: Vec<String> = self
            .planner
            .store()
            .events_on(day)
            .into_iter()
            .map(|event| {
                if with_ids {
                    format!("[{}]:  {event}", event.id)
                } else {
                    event.to_string()
                }
            })
            .collect();

        if lines.is_empty() {
            return writeln!(self.output, "{day} has no plans");
        }
        writeln!(self.output, "Plans for {day}:")?;
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    fn show_week(&mut self) -> io::Result<()> {
        let week: Vec<(Weekday, Vec<String>)> = self
            .planner
            .store()
            .week()
            .into_iter()
            .map(|(day, events)| (day, events.iter().map(ToString::to_string).collect()))
            .collect();

        writeln!(self.output, "------- THIS WEEKS SCHEDULE -------")?;
        for (day, lines) in week {
            writeln!(self.output, "{day}:")?;
            if lines.is_empty() {
                writeln!(self.output, "    --No plans--")?;
            }
            for line in lines {
                writeln!(self.output, "    {line}")?;
            }
        }
        self.pause()
    }

    fn save_plans(&mut self) -> io::Result<()> {
        if self.planner.store().is_empty() {
            return writeln!(self.output, "There are no plans to save");
        }
        if !self.ask_for_file_name()? {
            return Ok(());
        }
        match self.planner.save() {
            Ok(path) => {
                let path = path.display().to_string();
                writeln!(self.output, "Plans saved! ({path})")
            }
            Err(err) => {
                let workdir = self.planner.files().workdir().display().to_string();
                writeln!(
                    self.output,
                    "Could not save plans. Does the program have write permission to {workdir}? ({err})"
                )
            }
        }
    }

    fn download_example(&mut self) -> io::Result<()> {
        if !self.planner.store().is_empty() {
            writeln!(
                self.output,
                "Your current plan is not empty. Are you sure you want to overwrite it (y/n)?"
            )?;
            write!(self.output, "Answer: ")?;
            let Some(answer) = self.read_line()? else {
                return Ok(());
            };
            if answer.trim().to_lowercase() != "y" {
                writeln!(
                    self.output,
                    "Okay, no worries. Nothing has been overwritten"
                )?;
                return self.pause();
            }
        }

        writeln!(self.output, "Downloading example plan...")?;
        let url = self.config.example_url.clone();
        match self.planner.download_example(&url) {
            Ok(count) => writeln!(
                self.output,
                "Example plan downloaded and loaded! ({count} events)"
            )?,
            Err(PlannerError::Remote(_)) => writeln!(
                self.output,
                "Could not download example plan. Is your computer connected to the internet?"
            )?,
            Err(err) => writeln!(self.output, "Could not load the example plan: {err}")?,
        }
        self.pause()
    }

    fn show_workdir(&mut self) -> io::Result<()> {
        let workdir = self.planner.files().workdir().display().to_string();
        writeln!(
            self.output,
            "Your working directory (the folder where the plans are saved) is at:"
        )?;
        writeln!(self.output, "{workdir}")?;
        self.pause()
    }

    /// Asks for a plan file name and selects it. Returns `false` when aborted.
    fn ask_for_file_name(&mut self) -> io::Result<bool> {
        for _ in 0..MAX_PROMPT_ATTEMPTS {
            writeln!(self.output, "Name of file (without file extension)?")?;
            writeln!(self.output, "Just press enter for the 'main plans' file")?;
            let Some(name) = self.read_line()? else {
                return Ok(false);
            };
            match self.planner.select_file(&name) {
                Ok(_) => return Ok(true),
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
        self.give_up().map(|_: Option<()>| false)
    }

    fn ask_day(&mut self, message: &str) -> io::Result<Option<Weekday>> {
        self.prompt_until(message, |line| {
            validate_day(line).map_err(|_| format!("{} is not a day!", line.to_lowercase()))
        })
    }

    fn ask_time(&mut self, message: &str) -> io::Result<Option<String>> {
        self.prompt_until(message, |line| {
            validate_time(line)
                .map(|_| line.to_string())
                .map_err(|_| format!("{line} is not a time"))
        })
    }

    /// Shows `message` and reads answers until `parse` accepts one.
    ///
    /// Returns `None` on end of input or after `MAX_PROMPT_ATTEMPTS` rejections.
    fn prompt_until<T>(
        &mut self,
        message: &str,
        mut parse: impl FnMut(&str) -> Result<T, String>,
    ) -> io::Result<Option<T>> {
        for _ in 0..MAX_PROMPT_ATTEMPTS {
            writeln!(self.output, "{message}")?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(reason) => writeln!(self.output, "{reason}")?,
            }
        }
        self.give_up()
    }

    fn give_up<T>(&mut self) -> io::Result<Option<T>> {
        writeln!(
            self.output,
            "Too many invalid answers. Returning to the main menu."
        )?;
        Ok(None)
    }

    fn pause(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        write!(self.output, "[Press enter to continue]")?;
        self.read_line().map(|_| ())
    }

    fn clear(&mut self) -> io::Result<()> {
        if self.config.clear_screen {
            write!(self.output, "\x1b[2J\x1b[H")?;
        }
        Ok(())
    }

    /// Reads one line without its terminator; `None` at end of input.
    ///
    /// Bytes that are not UTF-8 become U+FFFD instead of failing the session.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;
        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Ok(None);
        }
        let mut line = String::from_utf8_lossy(&raw).into_owned();
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}

fn to_io_error(err: PlannerError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
}
