//! URDF XML parser.
//!
//! Reads the single-link subset used for static scenery: `link`,
//! `inertial/mass`, `visual` and `collision` with `origin`, `geometry`
//! (`box`, `sphere`, `cylinder`) and `material/color`, including named
//! materials declared at robot level.

use bevy::prelude::*;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;
use std::io::BufRead;

use super::types::{UrdfCollision, UrdfLink, UrdfOrigin, UrdfRobot, UrdfVisual};
use crate::error::{UrdfError, UrdfResult};
use crate::types::Geometry;

/// Parse a URDF document.
///
/// # Errors
///
/// Returns an error if the XML is malformed, the `robot` element is missing,
/// or a required attribute cannot be parsed.
pub fn parse_urdf_str(xml: &str) -> UrdfResult<UrdfRobot> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut robot = None;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"robot" => {
                robot = Some(parse_robot(&mut reader, e)?);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(UrdfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    let robot = robot.ok_or_else(|| UrdfError::missing_element("robot", "URDF document"))?;
    if robot.links.is_empty() {
        return Err(UrdfError::NoLinks(robot.name));
    }
    Ok(robot)
}

fn parse_robot<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> UrdfResult<UrdfRobot> {
    let mut robot = UrdfRobot::new(attribute(start, "name", "robot")?);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"link" => {
                    let link = parse_link(reader, e)?;
                    robot.links.push(link);
                }
                b"joint" => {
                    robot.joints.push(attribute(e, "name", "joint")?);
                    skip_element(reader, b"joint")?;
                }
                b"material" => {
                    let name = attribute(e, "name", "material")?;
                    if let Some(rgba) = parse_material(reader)? {
                        robot.materials.insert(name, rgba);
                    }
                }
                other => {
                    let other = other.to_vec();
                    skip_element(reader, &other)?;
                }
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"link" => robot.links.push(UrdfLink::new(attribute(e, "name", "link")?)),
                b"joint" => robot.joints.push(attribute(e, "name", "joint")?),
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"robot" => break,
            Ok(Event::Eof) => return Err(UrdfError::XmlParse("unexpected EOF in robot".into())),
            Ok(_) => {}
            Err(e) => return Err(UrdfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    robot.resolve_materials();
    Ok(robot)
}

/// Colour of a robot-level `<material>`, if it has one.
fn parse_material<R: BufRead>(reader: &mut Reader<R>) -> UrdfResult<Option<[f32; 4]>> {
    let mut rgba = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if e.name().as_ref() == b"color" => {
                rgba = Some(rgba_attribute(e)?);
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"material" => break,
            Ok(Event::Eof) => return Err(UrdfError::XmlParse("unexpected EOF in material".into())),
            Ok(_) => {}
            Err(e) => return Err(UrdfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(rgba)
}

fn parse_link<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> UrdfResult<UrdfLink> {
    let mut link = UrdfLink::new(attribute(start, "name", "link")?);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"inertial" => link.mass = parse_inertial(reader)?,
                b"visual" => {
                    let shape = parse_shape_element(reader, b"visual")?;
                    match shape.geometry {
                        Some(geometry) => link.visuals.push(UrdfVisual {
                            origin: shape.origin,
                            geometry,
                            rgba: shape.rgba,
                            material: shape.material,
                        }),
                        None => warn!("link {}: skipping visual with unsupported geometry", link.name),
                    }
                }
                b"collision" => {
                    let shape = parse_shape_element(reader, b"collision")?;
                    match shape.geometry {
                        Some(geometry) => link.collisions.push(UrdfCollision {
                            origin: shape.origin,
                            geometry,
                        }),
                        None => warn!("link {}: skipping collision with unsupported geometry", link.name),
                    }
                }
                other => {
                    let other = other.to_vec();
                    skip_element(reader, &other)?;
                }
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"link" => break,
            Ok(Event::Eof) => return Err(UrdfError::XmlParse("unexpected EOF in link".into())),
            Ok(_) => {}
            Err(e) => return Err(UrdfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(link)
}

/// Returns the link mass.
fn parse_inertial<R: BufRead>(reader: &mut Reader<R>) -> UrdfResult<f32> {
    let mut mass = 0.0;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) if e.name().as_ref() == b"mass" => {
                mass = float_attribute(e, "value", "mass")?;
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"inertial" => break,
            Ok(Event::Eof) => return Err(UrdfError::XmlParse("unexpected EOF in inertial".into())),
            Ok(_) => {}
            Err(e) => return Err(UrdfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(mass)
}

/// Contents of a `visual` or `collision` element.
#[derive(Default)]
struct ShapeElement {
    origin: UrdfOrigin,
    geometry: Option<Geometry>,
    rgba: Option<[f32; 4]>,
    material: Option<String>,
}

fn parse_shape_element<R: BufRead>(reader: &mut Reader<R>, end: &[u8]) -> UrdfResult<ShapeElement> {
    let mut shape = ShapeElement::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"origin" => shape.origin = parse_origin(e)?,
                b"box" => {
                    let size = vec3_attribute(e, "size", "box")?;
                    shape.geometry = Some(Geometry::cuboid(size / 2.0));
                }
                b"sphere" => {
                    shape.geometry = Some(Geometry::sphere(float_attribute(e, "radius", "sphere")?));
                }
                b"cylinder" => {
                    shape.geometry = Some(Geometry::cylinder(
                        float_attribute(e, "radius", "cylinder")?,
                        float_attribute(e, "length", "cylinder")?,
                    ));
                }
                b"material" => shape.material = optional_attribute(e, "name")?,
                b"color" => shape.rgba = Some(rgba_attribute(e)?),
                // geometry wrapper and unsupported shapes such as mesh
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == end => break,
            Ok(Event::Eof) => return Err(UrdfError::XmlParse("unexpected EOF in shape".into())),
            Ok(_) => {}
            Err(e) => return Err(UrdfError::XmlParse(e.to_string())),
        }
        buf.clear();
    }

    Ok(shape)
}

fn parse_origin(e: &BytesStart) -> UrdfResult<UrdfOrigin> {
    let xyz = optional_attribute(e, "xyz")?
        .map(|raw| parse_vec3(&raw).ok_or_else(|| invalid(raw, "xyz", "origin")))
        .transpose()?
        .unwrap_or(Vec3::ZERO);
    let rpy = optional_attribute(e, "rpy")?
        .map(|raw| parse_vec3(&raw).ok_or_else(|| invalid(raw, "rpy", "origin")))
        .transpose()?
        .unwrap_or(Vec3::ZERO);

    Ok(UrdfOrigin { xyz, rpy })
}

fn skip_element<R: BufRead>(reader: &mut Reader<R>, name: &[u8]) -> UrdfResult<()> {
    let mut buf = Vec::new();
    reader
        .read_to_end_into(QName(name), &mut buf)
        .map_err(|e| UrdfError::XmlParse(e.to_string()))?;
    Ok(())
}

fn optional_attribute(e: &BytesStart, name: &'static str) -> UrdfResult<Option<String>> {
    let attr = e
        .try_get_attribute(name)
        .map_err(|err| UrdfError::XmlParse(err.to_string()))?;
    attr.map(|a| {
        a.unescape_value()
            .map(|v| v.into_owned())
            .map_err(|err| UrdfError::XmlParse(err.to_string()))
    })
    .transpose()
}

fn attribute(e: &BytesStart, name: &'static str, element: &str) -> UrdfResult<String> {
    optional_attribute(e, name)?.ok_or_else(|| UrdfError::missing_attribute(name, element))
}

fn floats_attribute(e: &BytesStart, name: &'static str, element: &str) -> UrdfResult<Vec<f32>> {
    let raw = attribute(e, name, element)?;
    raw.split_whitespace()
        .map(str::parse::<f32>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid(raw.clone(), name, element))
}

fn float_attribute(e: &BytesStart, name: &'static str, element: &str) -> UrdfResult<f32> {
    match floats_attribute(e, name, element)?[..] {
        [value] => Ok(value),
        _ => Err(invalid_attribute(e, name, element)),
    }
}

fn rgba_attribute(e: &BytesStart) -> UrdfResult<[f32; 4]> {
    match floats_attribute(e, "rgba", "color")?[..] {
        [r, g, b, a] => Ok([r, g, b, a]),
        _ => Err(invalid_attribute(e, "rgba", "color")),
    }
}

fn vec3_attribute(e: &BytesStart, name: &'static str, element: &str) -> UrdfResult<Vec3> {
    let raw = attribute(e, name, element)?;
    parse_vec3(&raw).ok_or_else(|| invalid(raw, name, element))
}

fn parse_vec3(raw: &str) -> Option<Vec3> {
    let values = raw
        .split_whitespace()
        .map(str::parse::<f32>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    match values[..] {
        [x, y, z] => Some(Vec3::new(x, y, z)),
        _ => None,
    }
}

fn invalid(value: String, attribute: &'static str, element: &str) -> UrdfError {
    UrdfError::InvalidAttribute {
        attribute,
        element: element.to_string(),
        value,
    }
}

fn invalid_attribute(e: &BytesStart, name: &'static str, element: &str) -> UrdfError {
    let value = optional_attribute(e, name).ok().flatten().unwrap_or_default();
    invalid(value, name, element)
}
