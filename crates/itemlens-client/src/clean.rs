// Copyright 2026 The itemlens authors
// Licensed under the Apache License, Version 2.0

// Field values come back as HTML fragments. Strip the tags, then decode
// entities: numeric references plus the common named set.
pub fn clean_field_text(input: &str) -> String {
    decode_entities(&strip_tags(input))
}

fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            ch if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        // Entity names are short; anything without a nearby semicolon is a
        // literal ampersand.
        let semi = tail[1..].find(';').map(|index| index + 1);
        match semi {
            Some(semi) if semi <= 32 => match decode_entity(&tail[1..semi]) {
                Some(decoded) => {
                    out.push_str(&decoded);
                    rest = &tail[semi + 1..];
                }
                None => {
                    out.push('&');
                    rest = &tail[1..];
                }
            },
            _ => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<String> {
    if let Some(number) = entity.strip_prefix('#') {
        let code = if let Some(hex) = number
            .strip_prefix('x')
            .or_else(|| number.strip_prefix('X'))
        {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            number.parse::<u32>().ok()?
        };
        return char::from_u32(code).map(String::from);
    }

    let replacement = match entity {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "deg" => "\u{B0}",
        "micro" => "\u{B5}",
        "plusmn" => "\u{B1}",
        "times" => "\u{D7}",
        "copy" => "\u{A9}",
        "reg" => "\u{AE}",
        "trade" => "\u{2122}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "hellip" => "\u{2026}",
        _ => return None,
    };
    Some(replacement.to_owned())
}
