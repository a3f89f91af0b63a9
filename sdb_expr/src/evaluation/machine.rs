//! In-memory machine used as an evaluation context
//!
//! Holds the 32 general registers and a sparse byte-addressed memory.
//! A [`MachineSnapshot`] describes initial state in TOML:
//!
//! ```toml
//! [registers]
//! sp = 0x80001000
//! a0 = 42
//!
//! [[memory]]
//! base = 0x80000000
//! words = [0x00000413, 0xdeadbeef]
//! ```

use crate::evaluation::context::{register_index, EvalContext, Word, REGISTER_NAMES};
use crate::logging::codes;
use crate::{log_error, log_success, log_warning};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// Errors loading or applying a machine snapshot
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MachineError {
    #[error("I/O error reading snapshot {path}: {message}")]
    SnapshotIo { path: String, message: String },

    #[error("Invalid snapshot: {message}")]
    SnapshotInvalid { message: String },

    #[error("Unknown register name in snapshot: {name}")]
    UnknownRegisterName { name: String },
}

impl MachineError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            MachineError::SnapshotIo { .. } => codes::machine::SNAPSHOT_IO,
            MachineError::SnapshotInvalid { .. } => codes::machine::SNAPSHOT_INVALID,
            MachineError::UnknownRegisterName { .. } => codes::machine::UNKNOWN_REGISTER_NAME,
        }
    }
}

/// One contiguous run of words starting at `base`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRegion {
    pub base: Word,
    #[serde(default)]
    pub words: Vec<Word>,
}

/// Serializable initial machine state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineSnapshot {
    #[serde(default)]
    pub registers: BTreeMap<String, Word>,
    #[serde(default)]
    pub memory: Vec<MemoryRegion>,
}

impl MachineSnapshot {
    pub fn from_toml_str(content: &str) -> Result<Self, MachineError> {
        toml::from_str(content).map_err(|e| {
            let error = MachineError::SnapshotInvalid {
                message: e.to_string(),
            };
            log_error!(error.error_code(), "Failed to parse machine snapshot");
            error
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MachineError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            let error = MachineError::SnapshotIo {
                path: path.display().to_string(),
                message: e.to_string(),
            };
            log_error!(error.error_code(), "Failed to read machine snapshot",
                "file" => path.display()
            );
            error
        })?;

        let snapshot = Self::from_toml_str(&content)?;

        log_success!(codes::success::SNAPSHOT_LOADED,
            "Machine snapshot loaded",
            "file" => path.display(),
            "registers" => snapshot.registers.len(),
            "regions" => snapshot.memory.len()
        );

        Ok(snapshot)
    }

    /// Build a machine from this snapshot
    pub fn into_machine(self) -> Result<SimulatedMachine, MachineError> {
        let mut machine = SimulatedMachine::new();

        for (name, value) in &self.registers {
            if !machine.set_register(name, *value) {
                let error = MachineError::UnknownRegisterName { name: name.clone() };
                log_error!(error.error_code(), &error.to_string());
                return Err(error);
            }
        }

        for region in &self.memory {
            let length = region.words.len() * 4;
            let overlaps = (0..length).any(|offset| {
                machine
                    .memory
                    .contains_key(&region.base.wrapping_add(offset as Word))
            });
            if overlaps {
                log_warning!("Memory region overlaps an earlier region; later words win",
                    "base" => format!("{:#x}", region.base),
                    "words" => region.words.len()
                );
            }

            let mut address = region.base;
            for word in &region.words {
                machine.write_word(address, *word);
                address = address.wrapping_add(4);
            }
        }

        Ok(machine)
    }
}

/// Register file plus sparse little-endian memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulatedMachine {
    registers: [Word; 32],
    memory: HashMap<Word, u8>,
}

impl SimulatedMachine {
    /// All registers zero, no memory mapped
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &str) -> Option<Word> {
        register_index(name).map(|index| self.registers[index])
    }

    /// Set a register by name. Returns false for unknown names. Writes to
    /// `$0` are accepted and discarded.
    pub fn set_register(&mut self, name: &str, value: Word) -> bool {
        match register_index(name) {
            Some(0) => true,
            Some(index) => {
                self.registers[index] = value;
                true
            }
            None => false,
        }
    }

    pub fn write_byte(&mut self, address: Word, value: u8) {
        self.memory.insert(address, value);
    }

    pub fn write_word(&mut self, address: Word, value: Word) {
        for (offset, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.write_byte(address.wrapping_add(offset as Word), byte);
        }
    }

    /// Unmapped bytes read as zero
    pub fn read_byte(&self, address: Word) -> u8 {
        self.memory.get(&address).copied().unwrap_or(0)
    }

    /// Number of mapped bytes
    pub fn mapped_bytes(&self) -> usize {
        self.memory.len()
    }
}

impl EvalContext for SimulatedMachine {
    fn lookup_register(&self, name: &str) -> Option<Word> {
        self.register(name)
    }

    fn read_memory(&self, address: Word, width_bytes: usize) -> Word {
        (0..width_bytes.min(4)).fold(0, |value, offset| {
            let byte = self.read_byte(address.wrapping_add(offset as Word));
            value | (Word::from(byte) << (8 * offset))
        })
    }
}
