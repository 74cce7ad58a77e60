use super::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Shown masked
    Secret,
    Number,
    /// One of a fixed set of values, changed by cycling
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: String,
}

impl Field {
    pub fn new(label: &'static str, kind: FieldKind) -> Self {
        Self {
            label,
            kind,
            value: String::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Value as it should appear on screen
    pub fn display_value(&self) -> String {
        match self.kind {
            FieldKind::Secret => "*".repeat(self.value.chars().count()),
            _ => self.value.clone(),
        }
    }
}

/// Ordered fields of a form plus its focus and submission status.
///
/// Values are kept exactly as typed; coercion happens only on submit.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet {
    fields: Vec<Field>,
    focus: usize,
    error: Option<String>,
    pending: bool,
}

impl FieldSet {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            focus: 0,
            error: None,
            pending: false,
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value.into();
        }
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Type a character into the focused field
    pub fn input(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            match field.kind {
                FieldKind::Choice(_) => {}
                _ => field.value.push(c),
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            match field.kind {
                FieldKind::Choice(_) => field.value.clear(),
                _ => {
                    field.value.pop();
                }
            }
        }
    }

    /// Step the focused choice field through its options
    pub fn cycle(&mut self, forward: bool) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        let FieldKind::Choice(options) = field.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }

        let next = match options.iter().position(|o| *o == field.value) {
            Some(i) if forward => (i + 1) % options.len(),
            Some(i) => (i + options.len() - 1) % options.len(),
            None if forward => 0,
            None => options.len() - 1,
        };
        field.value = options[next].to_string();
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn begin_submit(&mut self) {
        self.error = None;
        self.pending = true;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.pending = false;
    }

    pub fn finish(&mut self) {
        self.error = None;
        self.pending = false;
    }

    fn label(&self, index: usize) -> &'static str {
        self.fields.get(index).map(|f| f.label).unwrap_or("Field")
    }

    /// Required text, surrounding whitespace removed
    pub fn text(&self, index: usize) -> Result<String, ValidationError> {
        let value = self.value(index).trim();
        if value.is_empty() {
            return Err(ValidationError::Missing(self.label(index)));
        }
        Ok(value.to_string())
    }

    /// Required text kept verbatim
    pub fn raw(&self, index: usize) -> Result<String, ValidationError> {
        let value = self.value(index);
        if value.is_empty() {
            return Err(ValidationError::Missing(self.label(index)));
        }
        Ok(value.to_string())
    }

    /// Required finite number satisfying `accept`
    pub fn number(
        &self,
        index: usize,
        accept: impl Fn(f64) -> bool,
        bound: &'static str,
    ) -> Result<f64, ValidationError> {
        let label = self.label(index);
        let value = self.value(index).trim();
        if value.is_empty() {
            return Err(ValidationError::Missing(label));
        }

        let number = value
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or(ValidationError::NotANumber(label))?;

        if !accept(number) {
            return Err(ValidationError::OutOfRange {
                field: label,
                bound,
            });
        }
        Ok(number)
    }

    /// Required choice among the field's options
    pub fn choice(&self, index: usize) -> Result<&str, ValidationError> {
        let label = self.label(index);
        let value = self.value(index).trim();
        if value.is_empty() {
            return Err(ValidationError::Missing(label));
        }

        match self.fields.get(index).map(|f| f.kind) {
            Some(FieldKind::Choice(options)) => options
                .iter()
                .copied()
                .find(|o| o.eq_ignore_ascii_case(value))
                .ok_or_else(|| ValidationError::InvalidChoice {
                    field: label,
                    allowed: options.join(", "),
                }),
            _ => Ok(value),
        }
    }
}
