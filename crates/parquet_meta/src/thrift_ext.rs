use thrift::protocol::{
    TFieldIdentifier,
    TInputProtocol,
    TListIdentifier,
    TOutputProtocol,
    TStructIdentifier,
    TType,
};

/// Upper bound on capacity we'll reserve up front for a list.
///
/// List sizes come from untrusted input, the vec still grows past this if the
/// list really is that long.
const MAX_LIST_PREALLOCATE: usize = 1024;

/// Reads and writes the struct to Thrift protocols.
///
/// Unlike [`thrift::protocol::TSerializable`] this uses generics instead of trait objects
pub trait TSerializable: Sized {
    fn read_from_in_protocol<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self>;
    fn write_to_out_protocol<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()>;
}

/// Values that can appear as elements of a thrift list.
pub trait ListElement: Sized {
    const ELEMENT_TYPE: TType;

    fn read_element<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self>;
    fn write_element<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()>;
}

impl ListElement for bool {
    const ELEMENT_TYPE: TType = TType::Bool;

    fn read_element<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_bool()
    }

    fn write_element<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_bool(*self)
    }
}

impl ListElement for i64 {
    const ELEMENT_TYPE: TType = TType::I64;

    fn read_element<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_i64()
    }

    fn write_element<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_i64(*self)
    }
}

impl ListElement for String {
    const ELEMENT_TYPE: TType = TType::String;

    fn read_element<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_string()
    }

    fn write_element<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_string(self)
    }
}

impl ListElement for Vec<u8> {
    const ELEMENT_TYPE: TType = TType::String;

    fn read_element<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Self> {
        i_prot.read_bytes()
    }

    fn write_element<T: TOutputProtocol>(&self, o_prot: &mut T) -> thrift::Result<()> {
        o_prot.write_bytes(self)
    }
}

/// Implement `ListElement` for structs that already implement
/// `TSerializable`.
macro_rules! impl_struct_list_element {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::thrift_ext::ListElement for $ty {
                const ELEMENT_TYPE: ::thrift::protocol::TType = ::thrift::protocol::TType::Struct;

                fn read_element<T: ::thrift::protocol::TInputProtocol>(
                    i_prot: &mut T,
                ) -> ::thrift::Result<Self> {
                    <$ty as $crate::thrift_ext::TSerializable>::read_from_in_protocol(i_prot)
                }

                fn write_element<T: ::thrift::protocol::TOutputProtocol>(
                    &self,
                    o_prot: &mut T,
                ) -> ::thrift::Result<()> {
                    <$ty as $crate::thrift_ext::TSerializable>::write_to_out_protocol(self, o_prot)
                }
            }
        )*
    };
}

pub(crate) use impl_struct_list_element;

pub fn read_list<E: ListElement, T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<Vec<E>> {
    let list_ident = i_prot.read_list_begin()?;
    if list_ident.size < 0 {
        return Err(protocol_error(format!(
            "negative list size: {}",
            list_ident.size
        )));
    }
    let size = list_ident.size as usize;

    let mut vals = Vec::with_capacity(size.min(MAX_LIST_PREALLOCATE));
    for _ in 0..size {
        vals.push(E::read_element(i_prot)?);
    }
    i_prot.read_list_end()?;

    Ok(vals)
}

pub fn write_list<E: ListElement, T: TOutputProtocol>(
    o_prot: &mut T,
    vals: &[E],
) -> thrift::Result<()> {
    o_prot.write_list_begin(&TListIdentifier::new(E::ELEMENT_TYPE, vals.len() as i32))?;
    for val in vals {
        val.write_element(o_prot)?;
    }
    o_prot.write_list_end()
}

/// Write a single field, `write_val` writes the value itself.
pub fn write_field<T, F>(
    o_prot: &mut T,
    name: &'static str,
    field_type: TType,
    id: i16,
    write_val: F,
) -> thrift::Result<()>
where
    T: TOutputProtocol,
    F: FnOnce(&mut T) -> thrift::Result<()>,
{
    o_prot.write_field_begin(&TFieldIdentifier::new(name, field_type, id))?;
    write_val(o_prot)?;
    o_prot.write_field_end()
}

/// Read a struct with no fields, skipping over anything a newer writer might
/// have put in it.
pub fn read_empty_struct<T: TInputProtocol>(i_prot: &mut T) -> thrift::Result<()> {
    i_prot.read_struct_begin()?;
    loop {
        let field_ident = i_prot.read_field_begin()?;
        if field_ident.field_type == TType::Stop {
            break;
        }
        i_prot.skip(field_ident.field_type)?;
        i_prot.read_field_end()?;
    }
    i_prot.read_struct_end()
}

pub fn write_empty_struct<T: TOutputProtocol>(
    o_prot: &mut T,
    name: &'static str,
) -> thrift::Result<()> {
    o_prot.write_struct_begin(&TStructIdentifier::new(name))?;
    o_prot.write_field_stop()?;
    o_prot.write_struct_end()
}

pub fn protocol_error(msg: impl Into<String>) -> thrift::Error {
    thrift::Error::Protocol(thrift::ProtocolError::new(
        thrift::ProtocolErrorKind::InvalidData,
        msg.into(),
    ))
}
