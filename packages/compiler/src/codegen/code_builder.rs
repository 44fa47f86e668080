//! Code Builder
//!
//! Line buffer with indentation used for all generated text.

const INDENT_WITH: &str = "    ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct EmittedLine {
    parts: Vec<String>,
    indent: usize,
}

impl EmittedLine {
    fn new(indent: usize) -> Self {
        EmittedLine {
            parts: Vec::new(),
            indent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBuilder {
    lines: Vec<EmittedLine>,
    indent: usize,
}

impl Default for CodeBuilder {
    fn default() -> Self {
        CodeBuilder::create_root()
    }
}

impl CodeBuilder {
    pub fn create_root() -> Self {
        CodeBuilder::new(0)
    }

    pub fn new(indent: usize) -> Self {
        CodeBuilder {
            lines: vec![EmittedLine::new(indent)],
            indent,
        }
    }

    fn current_line_mut(&mut self) -> &mut EmittedLine {
        if self.lines.is_empty() {
            self.lines.push(EmittedLine::new(self.indent));
        }
        let last = self.lines.len() - 1;
        &mut self.lines[last]
    }

    pub fn println(&mut self, last_part: &str) {
        self.print(last_part, true);
    }

    pub fn print(&mut self, part: &str, new_line: bool) {
        if !part.is_empty() {
            self.current_line_mut().parts.push(part.to_string());
        }
        if new_line {
            self.lines.push(EmittedLine::new(self.indent));
        }
    }

    /// Blank separator line; collapses with a preceding blank line.
    pub fn blank_line(&mut self) {
        let previous_is_blank = self.lines.len() < 2
            || self.lines[self.lines.len() - 2].parts.is_empty();
        if self.line_is_empty() && !previous_is_blank {
            self.lines.push(EmittedLine::new(self.indent));
        }
    }

    pub fn line_is_empty(&self) -> bool {
        self.lines.last().map_or(true, |l| l.parts.is_empty())
    }

    /// True when nothing has been printed.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.parts.is_empty())
    }

    pub fn inc_indent(&mut self) {
        self.indent += 1;
        if self.line_is_empty() {
            let indent = self.indent;
            self.current_line_mut().indent = indent;
        }
    }

    pub fn dec_indent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        if self.line_is_empty() {
            let indent = self.indent;
            self.current_line_mut().indent = indent;
        }
    }

    /// Append the lines of `other`, shifted to the current indentation.
    pub fn append(&mut self, other: &CodeBuilder) {
        if !self.line_is_empty() {
            self.lines.push(EmittedLine::new(self.indent));
        }
        self.lines.pop();

        for line in other.source_lines() {
            self.lines.push(EmittedLine {
                parts: line.parts.clone(),
                indent: self.indent + line.indent,
            });
        }
        self.lines.push(EmittedLine::new(self.indent));
    }

    /// Print `{receiver}({args})` with one argument per line, optionally
    /// assigned to a new local.
    pub fn print_call(&mut self, assign_to: Option<&str>, callee: &str, arguments: &[String]) {
        let head = match assign_to {
            Some(local) => format!("var {} = {}(", local, callee),
            None => format!("{}(", callee),
        };
        self.println(&head);
        self.inc_indent();
        for (index, argument) in arguments.iter().enumerate() {
            if index + 1 == arguments.len() {
                self.println(&format!("{});", argument));
            } else {
                self.println(&format!("{},", argument));
            }
        }
        if arguments.is_empty() {
            self.println(");");
        }
        self.dec_indent();
    }

    fn source_lines(&self) -> &[EmittedLine] {
        match self.lines.last() {
            Some(last) if last.parts.is_empty() => &self.lines[..self.lines.len() - 1],
            _ => &self.lines,
        }
    }

    pub fn to_source(&self) -> String {
        self.source_lines()
            .iter()
            .map(|l| {
                if !l.parts.is_empty() {
                    format!("{}{}", INDENT_WITH.repeat(l.indent), l.parts.join(""))
                } else {
                    String::new()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
