// Distributed under the OSI-approved BSD 2-Clause License.
// See accompanying LICENSE file for details.

use crate::data::definition::{Group, Value};

peg::parser! {
    pub grammar definition() for str {
        rule ws() = quiet!{[' ' | '\t']*}
        rule comment() = ";" [^ '\n']*
        rule newline() = "\r"? "\n"
        rule line_end() = ws() comment()? (newline() / ![_])
        rule blank() = ws() comment()? newline()

        rule header() -> String
            = ws() "[" n:$([^ ']' | '\n' | '\r']+) "]" line_end() { n.trim().into() }

        rule key() -> String
            = k:$(['a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '.' | '-']+) { k.to_lowercase() }

        rule digits() = ['0'..='9']+

        rule float() -> f64
            = n:$("-"? digits() "." digits()?) {? n.parse().or(Err("float")) }

        rule integer() -> i64
            = n:$("-"? digits()) {? n.parse().or(Err("integer")) }

        rule scalar() -> f64
            = f:float() { f }
            / i:integer() { i as f64 }

        rule vector() -> Value
            = first:scalar() rest:(ws() "," ws() s:scalar() { s })+ &line_end() {
                let mut components = Vec::with_capacity(rest.len() + 1);
                components.push(first);
                components.extend(rest);
                Value::Vector(components)
            }

        rule number() -> Value
            = f:float() &line_end() { Value::Float(f) }
            / i:integer() &line_end() { Value::Integer(i) }

        rule quoted() -> Value
            = "\"" s:$([^ '"' | '\n']*) "\"" &line_end() { Value::String(s.into()) }

        rule bare() -> Value
            = s:$([^ ';' | '\n' | '\r']+) { Value::String(s.trim_end().into()) }

        rule value() -> Value
            = vector() / number() / quoted() / bare()

        rule entry() -> (String, Value)
            = ws() k:key() ws() "=" ws() v:value() line_end() { (k, v) }

        rule group() -> Group
            = blank()* name:header() entries:(blank()* e:entry() { e })* {
                Group::new(name, entries)
            }

        pub rule file() -> Vec<Group>
            = groups:group()* blank()* ws() comment()? { groups }
    }
}
