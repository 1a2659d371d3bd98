//! # Interactive Game
//!
//! The numbered menu loop. Reads choices line by line from any `BufRead` and
//! writes to any `Write`, so a session can be scripted in tests.
//!
//! ## Menu
//!
//! 1. List villages
//! 2. Show pack
//! 3. Liberate the current village
//! 4. Use or discard an item
//! 5. Search the pack or the villages
//! 6. Show progress
//! 7. Quit
//!
//! End of input quits as if `7` had been chosen.

use std::io::{self, BufRead, Write};
use stockpile_core::{
    Abandon, BoundedCollection, EvictionPolicy, Liberation, Record, StockpileError, Transfer,
    World,
};

// =============================================================================
// GAME
// =============================================================================

/// One play session over a world.
pub struct Game<R, W> {
    world: World,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Game<R, W> {
    pub fn new(world: World, input: R, output: W) -> Self {
        Self {
            world,
            input,
            output,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Run the menu until the player quits or input ends.
    pub fn run(&mut self) -> Result<(), StockpileError> {
        self.menu_loop()
            .map_err(|e| StockpileError::IoError(e.to_string()))
    }

    fn menu_loop(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output, "\n=== Village Rescue ===")?;
            writeln!(self.output, "1. List villages")?;
            writeln!(self.output, "2. Show pack")?;
            writeln!(self.output, "3. Liberate village")?;
            writeln!(self.output, "4. Use / discard item")?;
            writeln!(self.output, "5. Search")?;
            writeln!(self.output, "6. Progress")?;
            writeln!(self.output, "7. Quit")?;

            let Some(choice) = self.prompt("\nChoice (1-7): ")? else {
                break;
            };
            match choice.as_str() {
                "1" => write_villages(&mut self.output, &self.world)?,
                "2" => write_pack(&mut self.output, self.world.pack())?,
                "3" => self.liberate()?,
                "4" => self.use_item()?,
                "5" => self.search()?,
                "6" => write_progress(&mut self.output, &self.world)?,
                "7" => break,
                other => {
                    tracing::debug!(choice = other, "invalid menu choice");
                    writeln!(self.output, "Invalid choice!")?;
                }
            }
        }

        writeln!(self.output, "Ending the game...")?;
        self.output.flush()
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;
        read_line(&mut self.input)
    }

    // =========================================================================
    // MENU ACTIONS
    // =========================================================================

    fn liberate(&mut self) -> io::Result<()> {
        if let Some(village) = self.world.current() {
            writeln!(
                self.output,
                "\nAttempting to liberate {}...",
                village.name()
            )?;
        }

        let mut policy = PromptEvict {
            input: &mut self.input,
            output: &mut self.output,
            failure: None,
        };
        let outcome = self.world.liberate(&mut policy);
        if let Some(e) = policy.failure {
            return Err(e);
        }

        match outcome {
            Liberation::AllCleared => {
                writeln!(self.output, "All villages have been liberated!")?;
            }
            Liberation::MissingRequirements { village, missing } => {
                let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
                writeln!(
                    self.output,
                    "To liberate {} you need: {}",
                    village,
                    names.join(", ")
                )?;
            }
            Liberation::Cleared { village, transfer } => {
                write_transfer(&mut self.output, &transfer)?;
                tracing::info!(village = %village, cleared = self.world.cleared_count(), "village liberated");
                writeln!(self.output, "{village} has been liberated!")?;
            }
            Liberation::Abandoned {
                village,
                reason,
                transfer,
            } => {
                for record in &transfer.evicted {
                    writeln!(self.output, "{} dropped from the pack.", record.name())?;
                }
                tracing::info!(village = %village, reason = %reason, "liberation abandoned");
                if let Abandon::UnknownItem(name) = &reason {
                    writeln!(self.output, "Item not found: {name}")?;
                }
                writeln!(
                    self.output,
                    "{village} keeps its items and your requirements were returned. Try again when you have room."
                )?;
            }
        }
        Ok(())
    }

    fn use_item(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n1. Use item")?;
        writeln!(self.output, "2. Discard item")?;
        let Some(choice) = self.prompt("\nChoice (1-2): ")? else {
            return Ok(());
        };
        let verb = match choice.as_str() {
            "1" => "use",
            "2" => "discard",
            _ => {
                writeln!(self.output, "Invalid choice!")?;
                return Ok(());
            }
        };

        if self.world.pack().is_empty() {
            writeln!(self.output, "\nPack is empty!")?;
            return Ok(());
        }
        writeln!(self.output, "\nItems in your pack:")?;
        write_pack_rows(&mut self.output, self.world.pack())?;

        let Some(name) = self.prompt(&format!("\nName of the item to {verb}: "))? else {
            return Ok(());
        };
        match self.world.use_item(&name) {
            Some(record) if verb == "use" => {
                writeln!(self.output, "{} used successfully!", record.name())?;
            }
            Some(record) => {
                writeln!(self.output, "{} removed from the pack!", record.name())?;
            }
            None => writeln!(self.output, "Item not found!")?,
        }
        Ok(())
    }

    fn search(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n1. Search the pack")?;
        writeln!(self.output, "2. Search the villages")?;
        let Some(choice) = self.prompt("Choice (1-2): ")? else {
            return Ok(());
        };
        if choice != "1" && choice != "2" {
            writeln!(self.output, "Invalid choice!")?;
            return Ok(());
        }
        let Some(name) = self.prompt("Item name to search for: ")? else {
            return Ok(());
        };

        if choice == "1" {
            match self.world.pack().get(&name) {
                Some(record) => writeln!(self.output, "{} found in the pack!", record.name())?,
                None => writeln!(self.output, "Item not found in the pack!")?,
            }
            return Ok(());
        }

        let villages = self.world.locate(&name);
        if villages.is_empty() {
            writeln!(self.output, "Item not found in any village!")?;
        } else {
            writeln!(self.output, "\n{name} found in these villages:")?;
            for village in villages {
                writeln!(self.output, "- {village}")?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// EVICTION PROMPT
// =============================================================================

/// Asks the player which item to drop when the pack is full.
///
/// An empty answer or end of input declines. I/O errors decline too and are
/// kept in `failure` for the caller to report.
struct PromptEvict<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
    failure: Option<io::Error>,
}

impl<R: BufRead, W: Write> PromptEvict<'_, R, W> {
    fn ask(&mut self, pack: &BoundedCollection, incoming: &Record) -> io::Result<Option<String>> {
        writeln!(
            self.output,
            "\nPack is full! Drop an item to make room for {incoming}."
        )?;
        writeln!(self.output, "\nItems in your pack:")?;
        write_pack_rows(self.output, pack)?;
        write!(self.output, "\nName of the item to drop: ")?;
        self.output.flush()?;
        Ok(read_line(self.input)?.filter(|answer| !answer.is_empty()))
    }
}

impl<R: BufRead, W: Write> EvictionPolicy for PromptEvict<'_, R, W> {
    fn choose(&mut self, pack: &BoundedCollection, incoming: &Record) -> Option<String> {
        match self.ask(pack, incoming) {
            Ok(answer) => answer,
            Err(e) => {
                self.failure = Some(e);
                None
            }
        }
    }
}

// =============================================================================
// RENDERING
// =============================================================================

/// Read one trimmed line. `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn write_transfer<W: Write>(out: &mut W, transfer: &Transfer) -> io::Result<()> {
    for record in &transfer.surrendered {
        writeln!(out, "{} handed over.", record.name())?;
    }
    for record in &transfer.evicted {
        writeln!(out, "{} dropped from the pack.", record.name())?;
    }
    for name in &transfer.transferred {
        writeln!(out, "{name} added to the pack.")?;
    }
    Ok(())
}

fn write_pack_rows<W: Write>(out: &mut W, pack: &BoundedCollection) -> io::Result<()> {
    for (i, item) in pack.list_view().enumerate() {
        if item.count > 1 {
            writeln!(
                out,
                "{}. {} (power: {}) x{}",
                i + 1,
                item.name,
                item.power,
                item.count
            )?;
        } else {
            writeln!(out, "{}. {} (power: {})", i + 1, item.name, item.power)?;
        }
    }
    Ok(())
}

/// Pack contents with fill level and total power.
pub fn write_pack<W: Write>(out: &mut W, pack: &BoundedCollection) -> io::Result<()> {
    writeln!(out, "\n=== Pack ({}/{}) ===", pack.size(), pack.capacity())?;
    if pack.is_empty() {
        return writeln!(out, "Pack is empty!");
    }
    write_pack_rows(out, pack)?;
    writeln!(out, "Total power: {}", pack.total_power())
}

/// Every village with its status, starting items and requirements.
pub fn write_villages<W: Write>(out: &mut W, world: &World) -> io::Result<()> {
    writeln!(out, "\n=== Villages ===")?;
    for (i, village) in world.containers().iter().enumerate() {
        let status = if village.is_cleared() {
            "Liberated"
        } else {
            "Awaiting rescue"
        };
        let items: Vec<&str> = village.manifest().iter().map(|name| name.as_str()).collect();
        writeln!(out, "{}. {} - {}", i + 1, village.name(), status)?;
        writeln!(out, "   Items: {}", items.join(", "))?;
        if !village.requirements().is_empty() {
            let needs: Vec<&str> = village
                .requirements()
                .iter()
                .map(|name| name.as_str())
                .collect();
            writeln!(out, "   Requires: {}", needs.join(", "))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Current village plus cleared and remaining lists.
pub fn write_progress<W: Write>(out: &mut W, world: &World) -> io::Result<()> {
    let progress = world.progress();
    writeln!(out, "\n=== Progress ===")?;
    match progress.current {
        Some(name) => writeln!(out, "Current village: {name}")?,
        None => writeln!(out, "All villages have been liberated!")?,
    }

    writeln!(out, "\nLiberated villages:")?;
    for name in &progress.cleared {
        writeln!(out, "- {name}")?;
    }
    writeln!(out, "\nVillages to liberate:")?;
    for name in &progress.remaining {
        writeln!(out, "- {name}")?;
    }

    writeln!(
        out,
        "\nTotal progress: {}/{} villages liberated.",
        progress.cleared.len(),
        progress.total
    )
}

// =============================================================================
// TESTS
// =============================================================================
