use std::collections::HashMap;

use tracing::debug;

use crate::error::{OptionsError, OptionsResult};
use crate::event::{EventSink, NullSink};
use crate::modes::{PlayMode, ScrollMode};
use crate::setting::{Setting, SettingType};
use crate::topbar::{self, KeyMatch, Position, Topbar};
use crate::validate;

/// Alias chains longer than this read as absent. Creation order already
/// rules out cycles; the cap guards traversal if that rule is ever relaxed.
const MAX_ALIAS_DEPTH: usize = 32;

/// Default topbar template: (line, position, text)
const DEFAULT_TOPBAR: [(usize, Position, &str); 7] = [
    (
        1,
        Position::Left,
        "%time_elapsed% %playstate% %time%%ifcursong% (%progresspercentage%%%)%endif%",
    ),
    (1, Position::Center, "%ifcursong%%artist%%endif%"),
    (
        1,
        Position::Right,
        "Vol: %volume%%%  Mode: %muteshort%%repeatshort%%randomshort%%manualshort%",
    ),
    (
        2,
        Position::Center,
        "%ifcursong%==> %title% <==%else%No current song%endif%",
    ),
    (3, Position::Left, "%listsize%"),
    (3, Position::Center, "%ifcursong%%album% (%year%)%endif%"),
    (3, Position::Right, "Q: %livequeuesize%"),
];

/// The settings registry: every named option, the option aliases, and the
/// topbar layout grid.
///
/// The registry owns its cells exclusively; aliases are indices into the
/// cell vector and never keep a cell alive on their own. All operations are
/// synchronous and run to completion; callers needing concurrent access
/// must serialize it externally.
pub struct Options {
    cells: Vec<Setting>,
    index: HashMap<String, usize>,
    topbar: Topbar,
    last_error: Option<OptionsError>,
    sink: Box<dyn EventSink>,
}

impl Default for Options {
    fn default() -> Options {
        Options::new()
    }
}

impl Options {
    /// Empty registry with no consumer attached. Call [`reset`](Self::reset)
    /// to install the default catalog.
    pub fn new() -> Options {
        Options::with_sink(Box::new(NullSink))
    }

    /// Empty registry that reports changes to `sink`.
    pub fn with_sink(sink: Box<dyn EventSink>) -> Options {
        Options {
            cells: Vec::new(),
            index: HashMap::new(),
            topbar: Topbar::new(),
            last_error: None,
            sink,
        }
    }

    /// Discard all cells and layout lines, then re-install the default
    /// catalog, the default aliases, and the default topbar template.
    pub fn reset(&mut self) {
        self.cells.clear();
        self.index.clear();
        self.topbar.clear();
        self.last_error = None;

        let _ = self.set_typed("scroll", SettingType::ScrollMode, "normal");
        let _ = self.set_typed("playmode", SettingType::PlayMode, "linear");
        let _ = self.set_typed("repeatmode", SettingType::RepeatMode, "none");
        let _ = self.set_typed(
            "columns",
            SettingType::FieldList,
            "artist track title album length",
        );

        self.set_integer("nextinterval", 5);
        self.set_integer("crossfade", 5);
        self.set_integer("mpd_timeout", 30);
        self.set_integer("repeatonedelay", 1);
        self.set_integer("stopdelay", 1);
        self.set_integer("reconnectdelay", 30);
        self.set_integer("directoryminlen", 30);
        self.set_integer("resetstatus", 3);
        self.set_integer("scrolloff", 0);

        self.set_boolean("debug", false);
        self.set_boolean("addtoreturns", false);
        self.set_boolean("ignorecase", true);
        self.set_boolean("regexsearch", false);
        self.set_boolean("followwindow", false);
        self.set_boolean("followcursor", false);
        self.set_boolean("followplayback", false);
        self.set_boolean("nextafteraction", true);
        self.set_boolean("showtopbar", true);
        self.set_boolean("topbarborders", false);
        self.set_boolean("topbarspace", true);
        self.set_boolean("columnspace", true);
        self.set_boolean("mouse", false);

        self.set_string("directoryformat", "%artist% - %title%");
        self.set_string(
            "xtermtitle",
            "MPD: %ifplaying% %artist% - %title% %else% Not playing %endif%",
        );
        self.set_string("onplaylistfinish", "");
        self.set_string("libraryroot", "");
        self.set_string("startuplist", "playlist");
        self.set_string("librarysort", "default");
        self.set_string("albumclass", "artist album date");

        self.set_string("status_unknown", "??");
        self.set_string("status_play", "|>");
        self.set_string("status_pause", "||");
        self.set_string("status_stop", "[]");

        let _ = self.alias("ic", "ignorecase");
        let _ = self.alias("so", "scrolloff");

        for (line, position, text) in DEFAULT_TOPBAR {
            let _ = self.topbar.write(line, position, text);
        }

        debug!("OPTIONS: reset to defaults, {} options", self.cells.len());
    }

    /// Exact-match lookup. Does not chase aliases.
    pub fn lookup(&self, key: &str) -> Option<&Setting> {
        self.index.get(key).map(|&i| &self.cells[i])
    }

    /// Resolve `key` through any alias chain to its terminal cell. None
    /// when the key is absent or the chain exceeds the traversal cap.
    pub fn resolve(&self, key: &str) -> Option<&Setting> {
        let i = self.lookup_index(key)?;
        self.resolve_index(i).map(|i| &self.cells[i])
    }

    /// Iterate over all cells in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Setting> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The layout grid backing the status display.
    pub fn topbar(&self) -> &Topbar {
        &self.topbar
    }

    /// Error recorded by the most recent failing `set`/`set_typed`/
    /// `toggle`/`alias` call. Overwritten (or cleared) on every such call.
    pub fn last_error(&self) -> Option<&OptionsError> {
        self.last_error.as_ref()
    }

    /// Point `key` at `target`. The target must already exist: aliases are
    /// declared after the options they name, which keeps chains acyclic.
    /// Re-aliasing an existing alias re-points it; an existing non-alias
    /// cell at `key` is a type conflict.
    pub fn alias(&mut self, key: &str, target: &str) -> OptionsResult<()> {
        let result = self.alias_inner(key, target);
        self.record(result)
    }

    fn alias_inner(&mut self, key: &str, target: &str) -> OptionsResult<()> {
        let target_index = self
            .lookup_index(target)
            .ok_or_else(|| OptionsError::InvalidOption(target.to_string()))?;
        let i = self.get_or_create(key, SettingType::Alias)?;
        self.cells[i].alias = Some(target_index);
        debug!("OPTIONS: alias {} -> {}", key, target);
        Ok(())
    }

    /// Primary entry point for caller-supplied text.
    ///
    /// Composite `topbar<N>.<position>` keys are routed to the layout grid;
    /// the raw value is additionally mirrored into a String cell under the
    /// same key so it shows up in `dump_all`. Ordinary keys must name an
    /// existing option; the value is converted according to the option's
    /// type. Writes chase alias references to their terminal cell. Every
    /// successful call notifies the event sink.
    pub fn set(&mut self, key: &str, value: &str) -> OptionsResult<()> {
        let result = self.set_inner(key, value);
        self.record(result)
    }

    fn set_inner(&mut self, key: &str, value: &str) -> OptionsResult<()> {
        match topbar::match_key(key) {
            KeyMatch::Line(line, position) => {
                self.topbar.write(line, position, value)?;
                self.set_string(key, value);
                debug!("OPTIONS: {} = {:?}", key, value);
                self.sink.notify("setting.topbar");
                return Ok(());
            }
            KeyMatch::Invalid(err) => return Err(err),
            KeyMatch::NoMatch => {}
        }

        let i = self
            .lookup_index(key)
            .ok_or_else(|| OptionsError::InvalidOption(key.to_string()))?;
        let terminal = self
            .resolve_index(i)
            .ok_or_else(|| OptionsError::InvalidOption(key.to_string()))?;
        let kind = self.cells[terminal].kind;
        self.store(terminal, kind, value)?;
        debug!("OPTIONS: {} = {:?}", key, value);
        self.sink.notify(&format!("setting.{}", key));
        Ok(())
    }

    /// Privileged create-or-convert entry point, used by the defaults
    /// catalog and by configuration loading. Performs the same conversions
    /// as [`set`](Self::set) but chooses the cell type explicitly, does not
    /// chase aliases, and emits no change notification.
    pub fn set_typed(&mut self, key: &str, kind: SettingType, value: &str) -> OptionsResult<()> {
        let result = self.set_typed_inner(key, kind, value);
        self.record(result)
    }

    fn set_typed_inner(&mut self, key: &str, kind: SettingType, value: &str) -> OptionsResult<()> {
        let i = self.get_or_create(key, kind)?;
        self.store(i, kind, value)
    }

    /// Trusted setter: create or fetch a String cell and overwrite it.
    /// Bypasses validation; a type conflict is a logged no-op.
    pub fn set_string(&mut self, key: &str, value: &str) {
        match self.get_or_create(key, SettingType::String) {
            Ok(i) => self.cells[i].text = value.to_string(),
            Err(_) => debug!("OPTIONS: ignoring string write to '{}'", key),
        }
    }

    /// Trusted setter for Integer cells; see [`set_string`](Self::set_string).
    pub fn set_integer(&mut self, key: &str, value: i64) {
        match self.get_or_create(key, SettingType::Integer) {
            Ok(i) => self.cells[i].number = value,
            Err(_) => debug!("OPTIONS: ignoring integer write to '{}'", key),
        }
    }

    /// Trusted setter for Boolean cells; see [`set_string`](Self::set_string).
    pub fn set_boolean(&mut self, key: &str, value: bool) {
        match self.get_or_create(key, SettingType::Boolean) {
            Ok(i) => self.cells[i].flag = value,
            Err(_) => debug!("OPTIONS: ignoring boolean write to '{}'", key),
        }
    }

    /// Flip a boolean option in place. Alias cells are not Boolean-typed;
    /// callers toggle the target key.
    pub fn toggle(&mut self, key: &str) -> OptionsResult<()> {
        let result = self.toggle_inner(key);
        self.record(result)
    }

    fn toggle_inner(&mut self, key: &str) -> OptionsResult<()> {
        let i = self
            .lookup_index(key)
            .ok_or_else(|| OptionsError::InvalidOption(key.to_string()))?;
        if self.cells[i].kind != SettingType::Boolean {
            return Err(OptionsError::NotBoolean(key.to_string()));
        }
        self.cells[i].flag = !self.cells[i].flag;
        debug!("OPTIONS: toggled {} to {}", key, self.cells[i].flag);
        self.sink.notify(&format!("setting.{}", key));
        Ok(())
    }

    /// Text payload of `key`, chasing aliases. None when the key is absent
    /// or the alias chain fails closed.
    pub fn string_value(&self, key: &str) -> Option<&str> {
        self.resolve(key).map(|cell| cell.text())
    }

    /// Integer payload of `key`, chasing aliases.
    pub fn integer_value(&self, key: &str) -> Option<i64> {
        self.resolve(key).map(|cell| cell.number())
    }

    /// Boolean payload of `key`, chasing aliases.
    pub fn bool_value(&self, key: &str) -> Option<bool> {
        self.resolve(key).map(|cell| cell.flag())
    }

    /// Legacy read: empty string when the key is absent. Callers that need
    /// to tell absent from empty use [`string_value`](Self::string_value).
    pub fn get_string(&self, key: &str) -> String {
        self.string_value(key).unwrap_or_default().to_string()
    }

    /// Legacy read: 0 when the key is absent.
    pub fn get_integer(&self, key: &str) -> i64 {
        self.integer_value(key).unwrap_or_default()
    }

    /// Legacy read: false when the key is absent.
    pub fn get_bool(&self, key: &str) -> bool {
        self.bool_value(key).unwrap_or_default()
    }

    /// Render one option in its re-readable form: `key=value` for
    /// string-backed and integer options, the bare key for booleans
    /// (`no`-prefixed when false).
    pub fn dump(&self, key: &str) -> OptionsResult<String> {
        let cell = self
            .lookup(key)
            .ok_or_else(|| OptionsError::InvalidOption(key.to_string()))?;
        Ok(self.render(cell))
    }

    /// Render every option, one `set` directive per line, in creation
    /// order. The output feeds back through [`commands::source`]
    /// unchanged.
    ///
    /// [`commands::source`]: crate::commands::source
    pub fn dump_all(&self) -> String {
        let mut output = String::new();
        for cell in &self.cells {
            output.push_str("set ");
            output.push_str(&self.render(cell));
            output.push('\n');
        }
        output
    }

    fn render(&self, cell: &Setting) -> String {
        // Alias cells render under their own key with the terminal cell's
        // kind and payload, so the line stays re-readable.
        let payload = match cell.alias.and_then(|i| self.resolve_index(i)) {
            Some(i) => &self.cells[i],
            None => cell,
        };
        match payload.kind {
            SettingType::Integer => format!("{}={}", cell.key, payload.number),
            SettingType::Boolean => {
                if payload.flag {
                    cell.key.clone()
                } else {
                    format!("no{}", cell.key)
                }
            }
            _ => format!("{}={}", cell.key, payload.text),
        }
    }

    fn lookup_index(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Index of the cell at `key`, creating it with `kind` if absent. An
    /// existing cell of a different kind is a type conflict; the cell is
    /// left untouched.
    fn get_or_create(&mut self, key: &str, kind: SettingType) -> OptionsResult<usize> {
        if let Some(i) = self.lookup_index(key) {
            if self.cells[i].kind != kind {
                return Err(OptionsError::TypeConflict(key.to_string()));
            }
            return Ok(i);
        }
        let i = self.cells.len();
        self.cells.push(Setting::new(key, kind));
        self.index.insert(key.to_string(), i);
        Ok(i)
    }

    fn resolve_index(&self, mut i: usize) -> Option<usize> {
        let mut hops = 0;
        while let Some(target) = self.cells[i].alias {
            hops += 1;
            if hops > MAX_ALIAS_DEPTH {
                debug!(
                    "OPTIONS: alias chain through '{}' exceeds {} hops, treating as absent",
                    self.cells[i].key, MAX_ALIAS_DEPTH
                );
                return None;
            }
            i = target;
        }
        Some(i)
    }

    /// Convert `value` according to `kind` and store it in the cell at `i`.
    /// The cell is untouched when conversion fails.
    fn store(&mut self, i: usize, kind: SettingType, value: &str) -> OptionsResult<()> {
        match kind {
            SettingType::String => self.cells[i].text = value.to_string(),
            SettingType::Integer => self.cells[i].number = validate::integer_prefix(value),
            SettingType::Boolean => {
                self.cells[i].flag = validate::parse_boolean(value)
                    .ok_or_else(|| OptionsError::InvalidBoolean(value.to_string()))?;
            }
            SettingType::FieldList => {
                validate::verify_columns(value)?;
                self.cells[i].text = value.to_string();
            }
            SettingType::PlayMode => {
                let mode = PlayMode::from_token(value)
                    .ok_or_else(|| OptionsError::InvalidPlayMode(value.to_string()))?;
                self.cells[i].text = value.to_string();
                self.cells[i].number = mode.value();
            }
            SettingType::ScrollMode => {
                let mode = ScrollMode::from_token(value)
                    .ok_or_else(|| OptionsError::InvalidScrollMode(value.to_string()))?;
                self.cells[i].text = value.to_string();
                self.cells[i].number = mode.value();
            }
            // Repeat mode carries no validator; untyped cells likewise
            // store the literal text.
            SettingType::Alias | SettingType::RepeatMode | SettingType::Invalid => {
                self.cells[i].text = value.to_string();
            }
        }
        Ok(())
    }

    fn record<T>(&mut self, result: OptionsResult<T>) -> OptionsResult<T> {
        self.last_error = result.as_ref().err().cloned();
        result
    }
}
