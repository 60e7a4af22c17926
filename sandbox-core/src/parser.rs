use crate::ast::{
    Axis, BodyDecl, DetectorDecl, DetectorKind, RestitutionDecl, Scene, ShapeDecl, SimulateDecl,
};
use crate::body::{IntegrationMethod, Material};
use crate::diagnostics::Span;
use glam::Vec3;
use thiserror::Error;

/// Parse error with optional span information
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{message}")]
    SyntaxError {
        message: String,
        span: Option<Span>,
    },
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::SyntaxError {
            message: message.into(),
            span,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::SyntaxError {
            message: message.into(),
            span: None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::SyntaxError { span, .. } => *span,
        }
    }
}

/// Helper to track byte offsets while parsing
struct ParseContext {
    line_offsets: Vec<usize>, // Byte offset of start of each line
    len: usize,
}

impl ParseContext {
    fn new(source: &str) -> Self {
        let mut line_offsets = vec![0];
        let mut offset = 0;
        for ch in source.chars() {
            offset += ch.len_utf8();
            if ch == '\n' {
                line_offsets.push(offset);
            }
        }
        Self {
            line_offsets,
            len: source.len(),
        }
    }

    fn line_start(&self, line: usize) -> usize {
        self.line_offsets.get(line).copied().unwrap_or(self.len)
    }

    /// Create a span for the entire line
    fn full_line_span(&self, line: usize) -> Span {
        Span::new(self.line_start(line), self.line_start(line + 1))
    }
}

/// Parse a scene description from source text
pub fn parse_scene(source: &str) -> Result<Scene, ParseError> {
    let ctx = ParseContext::new(source);
    let mut gravity = None;
    let mut restitutions = Vec::new();
    let mut bodies = Vec::new();
    let mut simulate = None;
    let mut detectors = Vec::new();

    for (i, raw) in source.lines().enumerate() {
        let line = raw.trim();
        let span = Some(ctx.full_line_span(i));

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let keyword = line.split_whitespace().next().unwrap_or("");
        match keyword {
            "gravity" => gravity = Some(parse_gravity(line, span)?),
            "restitution" | "restitution_ordered" => {
                restitutions.push(parse_restitution(line, span)?)
            }
            "body" => bodies.push(parse_body(line, span)?),
            "simulate" => simulate = Some(parse_simulate(line, span)?),
            "detect" => detectors.push(parse_detector(line, span)?),
            other => {
                return Err(ParseError::new(
                    format!("Unexpected token: {}", other),
                    span,
                ));
            }
        }
    }

    let simulate =
        simulate.ok_or_else(|| ParseError::message("Missing 'simulate' declaration"))?;

    Ok(Scene {
        gravity,
        restitutions,
        bodies,
        simulate,
        detectors,
    })
}

/// Parse `gravity (x, y, z)`
fn parse_gravity(line: &str, span: Option<Span>) -> Result<Vec3, ParseError> {
    let rest = line
        .strip_prefix("gravity")
        .ok_or_else(|| ParseError::new("Expected 'gravity' keyword", span))?;
    parse_vec3(rest, span)
}

/// Parse `restitution a b = e` or `restitution_ordered a b = e`
fn parse_restitution(line: &str, span: Option<Span>) -> Result<RestitutionDecl, ParseError> {
    let (symmetric, rest) = if let Some(rest) = line.strip_prefix("restitution_ordered ") {
        (false, rest)
    } else if let Some(rest) = line.strip_prefix("restitution ") {
        (true, rest)
    } else {
        return Err(ParseError::new("Expected 'restitution' keyword", span));
    };

    let eq_pos = rest.find('=').ok_or_else(|| {
        ParseError::new(format!("Expected '=' in restitution: {}", line), span)
    })?;

    let names: Vec<&str> = rest[..eq_pos].split_whitespace().collect();
    if names.len() != 2 {
        return Err(ParseError::new(
            format!("Expected two material names in restitution: {}", line),
            span,
        ));
    }

    Ok(RestitutionDecl {
        a: parse_material(names[0], span)?,
        b: parse_material(names[1], span)?,
        value: parse_number(&rest[eq_pos + 1..], span)?,
        symmetric,
        span,
    })
}

/// Parse a body declaration:
/// `body name sphere r at (x, y, z) [velocity (x, y, z)] [inv_mass m] [fixed] [material m] [method k]`
/// or the same with `plane (nx, ny, nz)` in place of `sphere r`
fn parse_body(line: &str, span: Option<Span>) -> Result<BodyDecl, ParseError> {
    let tokens = tokenize(line);
    if tokens.len() < 6 || tokens[0] != "body" {
        return Err(ParseError::new(
            format!("Incomplete body declaration: {}", line),
            span,
        ));
    }

    let name = tokens[1].to_string();
    if !is_valid_identifier(&name) {
        return Err(ParseError::new(format!("Invalid body name '{}'", name), span));
    }

    let shape = match tokens[2] {
        "sphere" => ShapeDecl::Sphere {
            radius: parse_number(tokens[3], span)?,
        },
        "plane" => ShapeDecl::Plane {
            normal: parse_vec3(tokens[3], span)?,
        },
        other => {
            return Err(ParseError::new(format!("Unknown shape '{}'", other), span));
        }
    };

    if tokens[4] != "at" {
        return Err(ParseError::new(
            format!("Expected 'at' in body declaration: {}", line),
            span,
        ));
    }
    let position = parse_vec3(tokens[5], span)?;

    let mut body = BodyDecl {
        name,
        shape,
        position,
        velocity: Vec3::ZERO,
        inverse_mass: 1.0,
        fixed: false,
        material: Material::Default,
        method: IntegrationMethod::SemiImplicitEuler,
        span,
    };

    let mut options = tokens[6..].iter();
    while let Some(option) = options.next() {
        if *option == "fixed" {
            body.fixed = true;
            continue;
        }
        let value = options.next().ok_or_else(|| {
            ParseError::new(format!("Missing value for '{}'", option), span)
        })?;
        match *option {
            "velocity" => body.velocity = parse_vec3(value, span)?,
            "inv_mass" => body.inverse_mass = parse_number(value, span)?,
            "material" => body.material = parse_material(value, span)?,
            "method" => {
                body.method = value
                    .parse::<IntegrationMethod>()
                    .map_err(|e| ParseError::new(e, span))?
            }
            other => {
                return Err(ParseError::new(
                    format!("Unknown body option '{}'", other),
                    span,
                ));
            }
        }
    }

    Ok(body)
}

/// Parse a simulate declaration: `simulate dt = x steps = n`
fn parse_simulate(line: &str, span: Option<Span>) -> Result<SimulateDecl, ParseError> {
    let rest = line
        .strip_prefix("simulate ")
        .ok_or_else(|| ParseError::new("Expected 'simulate' keyword", span))?;

    let dt_start = rest.find("dt = ").ok_or_else(|| {
        ParseError::new(format!("Expected 'dt =' in simulate: {}", line), span)
    })?;
    let after_dt = &rest[dt_start + 5..];
    let dt_end = after_dt.find(" steps = ").ok_or_else(|| {
        ParseError::new(format!("Expected 'steps =' in simulate: {}", line), span)
    })?;

    let dt = parse_number(&after_dt[..dt_end], span)?;
    let steps_str = after_dt[dt_end + 9..].trim();
    let steps = steps_str.parse::<usize>().map_err(|_| {
        ParseError::new(format!("Invalid step count: {}", steps_str), span)
    })?;

    Ok(SimulateDecl { dt, steps, span })
}

/// Parse a detector declaration:
/// `detect name = position(a).y`, `velocity(a).x`, `speed(a)` or `distance(a, b)`
fn parse_detector(line: &str, span: Option<Span>) -> Result<DetectorDecl, ParseError> {
    let rest = line
        .strip_prefix("detect ")
        .ok_or_else(|| ParseError::new("Expected 'detect' keyword", span))?;

    let eq_pos = rest.find(" = ").ok_or_else(|| {
        ParseError::new(format!("Expected '=' in detector: {}", line), span)
    })?;

    let name = rest[..eq_pos].trim().to_string();
    let expr = rest[eq_pos + 3..].trim();

    let open = expr.find('(').ok_or_else(|| {
        ParseError::new(format!("Expected '(' in detector: {}", line), span)
    })?;
    let close = expr.find(')').ok_or_else(|| {
        ParseError::new(format!("Expected ')' in detector: {}", line), span)
    })?;
    if close < open {
        return Err(ParseError::new(format!("Malformed detector: {}", line), span));
    }

    let func = expr[..open].trim();
    let args: Vec<String> = expr[open + 1..close]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let suffix = expr[close + 1..].trim();

    let single = |args: &[String]| -> Result<String, ParseError> {
        match args {
            [only] => Ok(only.clone()),
            _ => Err(ParseError::new(
                format!("Expected one body name in {} detector: {}", func, line),
                span,
            )),
        }
    };

    let kind = match func {
        "position" => DetectorKind::Position {
            body: single(&args[..])?,
            axis: parse_axis(suffix, line, span)?,
        },
        "velocity" => DetectorKind::Velocity {
            body: single(&args[..])?,
            axis: parse_axis(suffix, line, span)?,
        },
        "speed" => DetectorKind::Speed(single(&args[..])?),
        "distance" => {
            if args.len() != 2 {
                return Err(ParseError::new(
                    format!("Expected two body names in distance detector: {}", line),
                    span,
                ));
            }
            DetectorKind::Distance {
                a: args[0].clone(),
                b: args[1].clone(),
            }
        }
        other => {
            return Err(ParseError::new(
                format!("Unknown detector type: {}", other),
                span,
            ));
        }
    };

    Ok(DetectorDecl { name, kind, span })
}

fn parse_axis(suffix: &str, line: &str, span: Option<Span>) -> Result<Axis, ParseError> {
    match suffix {
        ".x" => Ok(Axis::X),
        ".y" => Ok(Axis::Y),
        ".z" => Ok(Axis::Z),
        _ => Err(ParseError::new(
            format!("Expected '.x', '.y' or '.z' after detector: {}", line),
            span,
        )),
    }
}

fn parse_material(s: &str, span: Option<Span>) -> Result<Material, ParseError> {
    s.trim()
        .parse::<Material>()
        .map_err(|e| ParseError::new(e, span))
}

fn parse_number(s: &str, span: Option<Span>) -> Result<f32, ParseError> {
    let s = s.trim();
    s.parse::<f32>()
        .map_err(|_| ParseError::new(format!("Invalid number: {}", s), span))
}

/// Parse `(x, y, z)`
fn parse_vec3(s: &str, span: Option<Span>) -> Result<Vec3, ParseError> {
    let s = s.trim();
    let inner = s
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| ParseError::new(format!("Expected '(x, y, z)', got: {}", s), span))?;

    let coords: Vec<&str> = inner.split(',').map(|c| c.trim()).collect();
    if coords.len() != 3 {
        return Err(ParseError::new(
            format!("Expected three coordinates: {}", s),
            span,
        ));
    }

    Ok(Vec3::new(
        parse_number(coords[0], span)?,
        parse_number(coords[1], span)?,
        parse_number(coords[2], span)?,
    ))
}

/// Split on whitespace, keeping parenthesised groups as one token
fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut start = None;

    for (i, ch) in line.char_indices() {
        if ch.is_whitespace() && depth == 0 {
            if let Some(st) = start.take() {
                tokens.push(&line[st..i]);
            }
            continue;
        }
        if start.is_none() {
            start = Some(i);
        }
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    if let Some(st) = start {
        tokens.push(&line[st..]);
    }

    tokens
}

/// Check if a string is a valid identifier
fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    // First char must be letter or underscore
    if !first.is_alphabetic() && first != '_' {
        return false;
    }

    chars.all(|c| c.is_alphanumeric() || c == '_')
}
