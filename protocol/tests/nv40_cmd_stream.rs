use pretty_assertions::assert_eq;
use reality_protocol::nv40::nv40_3d::{
    NV30_3D_VERTEX_BEGIN_END, NV30_3D_VIEWPORT_HORIZ, NV40_3D_VTX_CACHE_INVALIDATE,
};
use reality_protocol::nv40::nv40_cmd::{
    nv40_call, nv40_jump, nv40_method_header, Nv40CmdDecodeError, Nv40CmdIter, Nv40CmdPacket,
    Nv40MethodHeader, Nv40MethodMode, NV40_RETURN, NV40_SUBCHANNEL_3D,
};

fn hdr(method: u32, count: u32) -> u32 {
    nv40_method_header(NV40_SUBCHANNEL_3D, method, count, Nv40MethodMode::Increasing)
}

#[test]
fn walks_methods_and_control_words() {
    let words = [
        hdr(NV40_3D_VTX_CACHE_INVALIDATE, 1),
        0,
        hdr(NV30_3D_VIEWPORT_HORIZ, 2),
        640 << 16,
        480 << 16,
        nv40_call(0x0020_0000),
        NV40_RETURN,
        nv40_jump(0x0010_0000),
    ];

    let packets: Vec<_> = Nv40CmdIter::new(&words)
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(packets.len(), 5);
    assert_eq!(
        packets[0].method(),
        Some((NV40_3D_VTX_CACHE_INVALIDATE, &[0u32][..]))
    );
    assert_eq!(
        packets[1].method(),
        Some((NV30_3D_VIEWPORT_HORIZ, &[640u32 << 16, 480 << 16][..]))
    );
    assert_eq!(packets[2], Nv40CmdPacket::Call { offset: 0x0020_0000 });
    assert_eq!(packets[3], Nv40CmdPacket::Return);
    assert_eq!(packets[4], Nv40CmdPacket::Jump { offset: 0x0010_0000 });
}

#[test]
fn non_increasing_header_round_trips_through_decoder() {
    let words = [
        nv40_method_header(
            NV40_SUBCHANNEL_3D,
            NV30_3D_VERTEX_BEGIN_END,
            3,
            Nv40MethodMode::NonIncreasing,
        ),
        5,
        0,
        5,
    ];
    let packet = Nv40CmdIter::new(&words).next().unwrap().unwrap();
    assert_eq!(
        packet,
        Nv40CmdPacket::Method {
            header: Nv40MethodHeader {
                method: NV30_3D_VERTEX_BEGIN_END,
                subchannel: 0,
                count: 3,
                mode: Nv40MethodMode::NonIncreasing,
            },
            args: &[5, 0, 5],
        }
    );
    assert_eq!(packet.len_words(), 4);
}

#[test]
fn truncated_packet_is_reported_once() {
    let words = [hdr(NV30_3D_VIEWPORT_HORIZ, 2), 640 << 16];
    let mut iter = Nv40CmdIter::new(&words);
    assert_eq!(
        iter.next(),
        Some(Err(Nv40CmdDecodeError::PacketOverrunsStream {
            offset: 0,
            count: 2,
            stream_len: 2,
        }))
    );
    assert_eq!(iter.next(), None);
}

#[test]
fn reserved_header_bits_are_rejected() {
    let words = [hdr(NV30_3D_VIEWPORT_HORIZ, 1) | 0x0001_0000, 0];
    let err = Nv40CmdIter::new(&words).next().unwrap().unwrap_err();
    assert_eq!(err, Nv40CmdDecodeError::BadHeader { word: words[0] });
    assert!(err.to_string().contains("0x00050a00"));
}
