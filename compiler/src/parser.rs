use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::{
    classifier::{classify, LineKind},
    error::{ProtoError, Result},
    normalizer::Line,
    tokenizer::tokenize_field,
    types::{Field, Message, ProtoFile},
    utils::{format_error, is_identifier, quote},
};

lazy_static! {
    static ref PACKAGE_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").unwrap();
}

/// Parser settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOptions {
    /// Reject what the lenient parser lets through: a message still open
    /// at end of input, a message name declared twice, and duplicate or zero
    /// field sequence numbers.
    pub strict: bool,
}

impl ParseOptions {
    pub fn strict() -> Self {
        ParseOptions { strict: true }
    }
}

#[derive(Debug)]
enum State {
    NoOpenMessage,
    InMessage { message: Message, line: usize },
}

/// The line automaton that assembles a [ProtoFile](struct.ProtoFile.html).
///
/// All parse state (open message, pending comments, package) lives in the
/// builder, so independent parses never share anything.
#[derive(Debug)]
pub struct SchemaBuilder {
    options:          ParseOptions,
    state:            State,
    pending_comments: Vec<String>,
    file:             ProtoFile,
}

impl SchemaBuilder {
    pub fn new(options: ParseOptions) -> Self {
        SchemaBuilder {
            options,
            state: State::NoOpenMessage,
            pending_comments: Vec::new(),
            file: ProtoFile::new(),
        }
    }

    /// Name of the message whose body is currently open.
    pub fn open_message(&self) -> Option<&str> {
        match &self.state {
            State::InMessage { message, .. } => Some(message.name()),
            State::NoOpenMessage => None,
        }
    }

    /// Consume one canonical line.
    pub fn feed(&mut self, line: &Line) -> Result<()> {
        match classify(&line.text) {
            LineKind::Package(name) => self.on_package(name, line.number),
            LineKind::MessageStart(name) => self.on_message_start(name, line.number),
            LineKind::CloseBrace => self.on_close(line.number),
            LineKind::OpenBrace | LineKind::Blank => Ok(()),
            LineKind::Field => self.on_field(line),
            LineKind::Comment(comment) => {
                self.pending_comments.push(comment.to_owned());
                Ok(())
            }
            LineKind::Import(target) => Err(ProtoError::Unsupported {
                feature: format!("import {}", target.unwrap_or_default()).trim_end().to_owned(),
                line:    line.number,
            }),
            LineKind::Unrecognized(_) => Err(ProtoError::Undefine {
                msg:  format!("Unsupported line {}", quote(&line.text)),
                line: line.number,
            }),
        }
    }

    /// End of input: hand back the finished file.
    pub fn finish(self) -> Result<ProtoFile> {
        if let State::InMessage { message, line } = self.state {
            if self.options.strict {
                return Err(format_error(
                    &format!("Message {} is never closed", quote(message.name())),
                    line,
                ));
            }
            warn!(message = message.name(), line, "input ended inside a message; dropping it");
        }
        if !self.pending_comments.is_empty() {
            debug!(count = self.pending_comments.len(), "discarding trailing comments");
        }
        debug!(messages = self.file.len(), "end of file");
        Ok(self.file)
    }

    fn on_package(&mut self, name: Option<&str>, line: usize) -> Result<()> {
        let name = name.ok_or_else(|| format_error("Expected a name after package", line))?;
        if !PACKAGE_NAME.is_match(name) {
            return Err(format_error(&format!("Invalid package name {}", quote(name)), line));
        }
        debug!(package = name, line, "package");
        self.file.package = name.to_owned();
        Ok(())
    }

    fn on_message_start(&mut self, name: Option<&str>, line: usize) -> Result<()> {
        if let State::InMessage { message, .. } = &self.state {
            return Err(format_error(
                &format!("Message {} already open; it has not been closed", quote(message.name())),
                line,
            ));
        }
        let name = name.ok_or_else(|| format_error("Expected a name after message", line))?;
        if !is_identifier(name) {
            return Err(format_error(&format!("Invalid message name {}", quote(name)), line));
        }

        let package = Some(self.file.package.clone()).filter(|package| !package.is_empty());
        let mut message = Message::new(name, package)?;
        for comment in self.pending_comments.drain(..) {
            message.add_comment(&comment);
        }
        debug!(message = name, line, "open message");
        self.state = State::InMessage { message, line };
        Ok(())
    }

    fn on_close(&mut self, line: usize) -> Result<()> {
        let message = match std::mem::replace(&mut self.state, State::NoOpenMessage) {
            State::InMessage { message, .. } => message,
            State::NoOpenMessage => {
                return Err(format_error("No open message to close", line));
            }
        };

        if self.file.contains(message.name()) {
            if self.options.strict {
                return Err(format_error(
                    &format!("Message {} is defined twice", quote(message.name())),
                    line,
                ));
            }
            warn!(message = message.name(), line, "message redefined; replacing the earlier definition");
        }
        debug!(message = message.name(), fields = message.fields().len(), line, "close message");
        self.file.insert(message);
        self.pending_comments.clear();
        Ok(())
    }

    fn on_field(&mut self, line: &Line) -> Result<()> {
        let message = match &mut self.state {
            State::InMessage { message, .. } => message,
            State::NoOpenMessage => {
                return Err(format_error(
                    &format!("Field declared outside a message: {}", quote(&line.text)),
                    line.number,
                ));
            }
        };

        let decl = tokenize_field(&line.text, line.number)?;
        let field = Field::typed(&decl.name, decl.field_type, decl.property, decl.sequence)?
            .with_comment(decl.comment);
        message.add_field(field);
        Ok(())
    }
}

/// Run the automaton over already normalized lines.
pub fn parse_lines(lines: &[Line], options: &ParseOptions) -> Result<ProtoFile> {
    let mut builder = SchemaBuilder::new(options.clone());
    for line in lines {
        builder.feed(line)?;
    }
    builder.finish()
}
