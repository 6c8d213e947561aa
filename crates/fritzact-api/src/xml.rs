// XML decoding for gateway responses.
//
// The gateway's documents are small and loosely structured (optional
// blocks per capability, empty text for absent devices), so the event
// stream is folded into a minimal element tree instead of a typed
// deserializer.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::trace;

use crate::auth::{SessionId, UserRight};
use crate::error::Error;
use crate::models::{
    DeviceElement, HkrElement, PowerMeterElement, SessionInfo, SwitchElement, TemperatureElement,
};

#[derive(Debug, Default)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self, String> {
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            attrs.push((key, value.into_owned()));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attrs,
            ..Self::default()
        })
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Trimmed text; empty text counts as absent.
    fn text(&self) -> Option<&str> {
        Some(self.text.trim()).filter(|t| !t.is_empty())
    }

    /// Text of a direct child element.
    fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).and_then(Element::text).map(ToOwned::to_owned)
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }
}

/// Attach a finished element to its parent, or make it the root.
fn close(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn parse_tree(body: &str) -> Result<Element, String> {
    let mut reader = Reader::from_str(body);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => stack.push(Element::open(e)?),
            Ok(Event::Empty(ref e)) => {
                let element = Element::open(e)?;
                close(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or("unbalanced end tag")?;
                close(&mut stack, &mut root, element);
            }
            Ok(Event::Text(ref t)) => {
                let text = t.unescape().map_err(|e| e.to_string())?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Ok(Event::CData(ref c)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(c));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!("at byte {}: {e}", reader.buffer_position()));
            }
            Ok(_) => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(format!("unexpected end of document inside <{}>", open.name));
    }
    root.ok_or_else(|| "no root element".to_owned())
}

fn parse_document(body: &str) -> Result<Element, Error> {
    parse_tree(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Xml {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

/// Decode a `<SessionInfo>` document.
pub fn parse_session_info(body: &str) -> Result<SessionInfo, Error> {
    let root = parse_document(body)?;

    let sid = root.child_text("SID").ok_or(Error::MissingElement { element: "SID" })?;
    let challenge = root.child_text("Challenge");
    let block_time = root.child_text("BlockTime")
        .map(|t| {
            t.parse::<u64>().map_err(|e| Error::Xml {
                message: format!("invalid BlockTime {t:?}: {e}"),
                body: body.to_owned(),
            })
        })
        .transpose()?
        .unwrap_or(0);

    let rights = root.child("Rights").map(parse_rights).unwrap_or_default();

    Ok(SessionInfo {
        sid: SessionId::new(sid),
        challenge,
        block_time,
        rights,
    })
}

/// `<Rights>` lists `<Name>` and `<Access>` siblings in matching order.
fn parse_rights(node: &Element) -> Vec<UserRight> {
    let names = node
        .children_named("Name")
        .filter_map(|c| c.text().map(ToOwned::to_owned));
    let access = node
        .children_named("Access")
        .map(|c| c.text().and_then(|t| t.parse().ok()).unwrap_or(0));

    names
        .zip(access)
        .map(|(name, access)| UserRight { name, access })
        .collect()
}

/// Decode a `<devicelist>` document into its element children, in document order.
pub fn parse_device_list(body: &str) -> Result<Vec<DeviceElement>, Error> {
    let root = parse_document(body)?;
    let devices: Vec<DeviceElement> = root.children.iter().map(parse_device).collect();
    trace!(count = devices.len(), "decoded device list");
    Ok(devices)
}

fn parse_device(node: &Element) -> DeviceElement {
    DeviceElement {
        tag: node.name.clone(),
        identifier: node.attr("identifier"),
        id: node.attr("id"),
        fw_version: node.attr("fwversion"),
        product_name: node.attr("productname"),
        manufacturer: node.attr("manufacturer"),
        function_bitmask: node.attr("functionbitmask"),
        name: node.child_text("name"),
        present: node.child_text("present"),
        switch: node.child("switch").map(|s| SwitchElement {
            state: s.child_text("state"),
            mode: s.child_text("mode"),
            lock: s.child_text("lock"),
        }),
        hkr: node.child("hkr").map(|h| HkrElement {
            tsoll: h.child_text("tsoll"),
            komfort: h.child_text("komfort"),
            absenk: h.child_text("absenk"),
        }),
        powermeter: node.child("powermeter").map(|p| PowerMeterElement {
            power: p.child_text("power"),
            energy: p.child_text("energy"),
        }),
        temperature: node.child("temperature").map(|t| TemperatureElement {
            celsius: t.child_text("celsius"),
        }),
        battery: node.child_text("battery"),
        battery_low: node.child_text("batterylow"),
    }
}
