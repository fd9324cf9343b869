use crate::models::*;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn fix(issue: &str, solution: &str, commands: &[&str]) -> TroubleshootingEntry {
    TroubleshootingEntry {
        issue: issue.to_string(),
        solution: solution.to_string(),
        commands: strings(commands),
    }
}

fn reference(title: &str, url: &str, kind: ReferenceKind) -> TemplateReference {
    TemplateReference {
        title: title.to_string(),
        url: url.to_string(),
        kind,
    }
}

// Variables shared by most RADIUS-backed templates

fn radius_server_ip() -> VariableSchema {
    VariableSchema::new("radius_server_ip", VariableKind::ip())
        .required()
        .with_label("RADIUS server IP")
        .with_description("Address of the RADIUS / NAC policy node")
}

fn radius_server_name() -> VariableSchema {
    VariableSchema::new(
        "radius_server_name",
        VariableKind::Text {
            pattern: Some("[A-Za-z0-9_.-]+".to_string()),
        },
    )
    .required()
    .with_default("NAC-RADIUS-1")
    .with_label("RADIUS server name")
}

fn radius_key() -> VariableSchema {
    VariableSchema::new(
        "radius_key",
        VariableKind::Password {
            pattern: Some(r"\S{8,}".to_string()),
        },
    )
    .required()
    .with_label("RADIUS shared secret")
    .with_description("At least 8 characters, no whitespace")
}

fn access_vlan() -> VariableSchema {
    VariableSchema::new("access_vlan", VariableKind::Number)
        .required()
        .with_label("Access VLAN")
}

fn interface_range(default: &str) -> VariableSchema {
    VariableSchema::new("interface_range", VariableKind::text())
        .required()
        .with_default(default)
        .with_label("Interface range")
}

const CISCO_SUPPORT: &str = "https://www.cisco.com/c/en/us/support/index.html";
const ARUBA_TECHDOCS: &str = "https://www.arubanetworks.com/techdocs/";
const JUNIPER_DOCS: &str = "https://www.juniper.net/documentation/";
const FORTINET_DOCS: &str = "https://docs.fortinet.com/";
const EXTREME_DOCS: &str = "https://documentation.extremenetworks.com/";

/// Built-in templates, in catalog order
pub fn default_templates() -> Vec<TemplateDefinition> {
    vec![
        TemplateDefinition {
            id: "cisco-c9300-dot1x-closed".to_string(),
            name: "Cisco Catalyst 802.1X Closed Mode".to_string(),
            description: "Wired 802.1X with RADIUS AAA in closed mode on access ports".to_string(),
            vendor: "Cisco".to_string(),
            model: "Catalyst 9300".to_string(),
            firmware: "IOS-XE 16.12+".to_string(),
            category: TemplateCategory::Authentication,
            body: r#"! 802.1X closed mode for {{interface_range}}
aaa new-model
aaa authentication dot1x default group NAC
aaa authorization network default group NAC
aaa accounting dot1x default start-stop group NAC
!
radius server {{radius_server_name}}
 address ipv4 {{radius_server_ip}} auth-port 1812 acct-port 1813
 key {{radius_key}}
!
aaa group server radius NAC
 server name {{radius_server_name}}
!
dot1x system-auth-control
!
interface range {{interface_range}}
 switchport mode access
 switchport access vlan {{access_vlan}}
 access-session host-mode {{host_mode}}
 access-session closed
 access-session port-control auto
 authentication periodic
 authentication timer reauthenticate {{reauth_timer}}
 dot1x pae authenticator
 spanning-tree portfast
!
end"#
                .to_string(),
            variables: vec![
                interface_range("GigabitEthernet1/0/1 - 48"),
                radius_server_name(),
                radius_server_ip(),
                radius_key(),
                access_vlan(),
                VariableSchema::new(
                    "host_mode",
                    VariableKind::select(["multi-auth", "multi-domain", "multi-host", "single-host"]),
                )
                .required()
                .with_default("multi-auth")
                .with_label("Host mode"),
                VariableSchema::new("reauth_timer", VariableKind::Number)
                    .with_default(7200)
                    .with_label("Reauthentication timer (s)"),
            ],
            tags: strings(&["802.1x", "wired", "radius", "closed-mode"]),
            use_cases: strings(&["802.1X wired authentication", "EAP-TLS certificate authentication", "Zero trust access"]),
            requirements: strings(&["RADIUS server reachable from the switch", "Supplicants configured on endpoints"]),
            troubleshooting: vec![
                fix(
                    "Clients stay unauthorized",
                    "Verify the RADIUS server is alive and the shared secret matches",
                    &["show aaa servers", "test aaa group NAC user pass new-code"],
                ),
                fix(
                    "Printers lose connectivity after enabling closed mode",
                    "Add MAB as a fallback method for non-802.1X devices",
                    &["show access-session interface detail"],
                ),
            ],
            references: vec![
                reference("Catalyst 9300 security configuration guide", CISCO_SUPPORT, ReferenceKind::Documentation),
            ],
        },
        TemplateDefinition {
            id: "cisco-c9300-mab".to_string(),
            name: "Cisco Catalyst MAC Authentication Bypass".to_string(),
            description: "MAB for headless devices with 802.1X preferred when available".to_string(),
            vendor: "Cisco".to_string(),
            model: "Catalyst 9300".to_string(),
            firmware: "IOS-XE 16.12+".to_string(),
            category: TemplateCategory::Authentication,
            body: r#"! MAC Authentication Bypass for {{interface_range}}
radius server {{radius_server_name}}
 address ipv4 {{radius_server_ip}} auth-port 1812 acct-port 1813
 key {{radius_key}}
!
mab request format attribute 1 groupsize 2 separator {{mac_separator}} lowercase
!
interface range {{interface_range}}
 switchport mode access
 switchport access vlan {{access_vlan}}
 mab
 access-session port-control auto
 authentication order {{auth_order}}
 authentication priority dot1x mab
!
end"#
                .to_string(),
            variables: vec![
                interface_range("GigabitEthernet1/0/1 - 48"),
                radius_server_name(),
                radius_server_ip(),
                radius_key(),
                VariableSchema::new("mac_separator", VariableKind::select(["-", ":", "."]))
                    .required()
                    .with_default("-")
                    .with_label("MAC separator"),
                access_vlan(),
                VariableSchema::new("auth_order", VariableKind::select(["dot1x mab", "mab dot1x"]))
                    .required()
                    .with_default("dot1x mab")
                    .with_label("Authentication order"),
            ],
            tags: strings(&["mab", "wired", "iot", "headless"]),
            use_cases: strings(&["MAB for IoT and printers", "802.1X wired authentication"]),
            requirements: strings(&["Endpoint MAC inventory imported into the NAC policy server"]),
            troubleshooting: vec![fix(
                "MAB never starts",
                "Lower the dot1x tx-period or reorder authentication to try MAB first",
                &["show authentication sessions interface"],
            )],
            references: vec![reference("MAC Authentication Bypass deployment guide", CISCO_SUPPORT, ReferenceKind::Guide)],
        },
        TemplateDefinition {
            id: "cisco-c9300-coa".to_string(),
            name: "Cisco Catalyst RADIUS Change of Authorization".to_string(),
            description: "Dynamic authorization (CoA) and web redirect ACL for posture and guest flows".to_string(),
            vendor: "Cisco".to_string(),
            model: "Catalyst 9300".to_string(),
            firmware: "IOS-XE 16.12+".to_string(),
            category: TemplateCategory::Authorization,
            body: r#"aaa server radius dynamic-author
 client {{radius_server_ip}} server-key {{coa_key}}
 port {{coa_port}}
 auth-type any
!
ip access-list extended {{redirect_acl}}
 deny udp any any eq domain
 deny tcp any host {{radius_server_ip}} eq 8443
 permit tcp any any eq www
 permit tcp any any eq 443
!
ip http server
ip http secure-server
!
end"#
                .to_string(),
            variables: vec![
                radius_server_ip(),
                VariableSchema::new(
                    "coa_key",
                    VariableKind::Password {
                        pattern: Some(r"\S{8,}".to_string()),
                    },
                )
                .required()
                .with_label("CoA shared secret"),
                VariableSchema::new("coa_port", VariableKind::Number)
                    .with_default(1700)
                    .with_label("CoA port"),
                VariableSchema::new(
                    "redirect_acl",
                    VariableKind::Text {
                        pattern: Some("[A-Za-z0-9_-]+".to_string()),
                    },
                )
                .required()
                .with_default("ACL-WEBAUTH-REDIRECT")
                .with_label("Redirect ACL name"),
            ],
            tags: strings(&["coa", "posture", "guest", "redirect"]),
            use_cases: strings(&["Guest portal redirect", "Posture assessment", "Dynamic VLAN assignment"]),
            requirements: strings(&["NAC policy server configured to send CoA on UDP 1700"]),
            troubleshooting: vec![fix(
                "CoA requests are ignored",
                "Confirm the server-key matches and the CoA port is not filtered",
                &["show aaa servers", "debug radius"],
            )],
            references: vec![],
        },
        TemplateDefinition {
            id: "cisco-c9800-wlan-dot1x".to_string(),
            name: "Cisco Catalyst 9800 WPA2/3-Enterprise WLAN".to_string(),
            description: "802.1X WLAN backed by a RADIUS server group".to_string(),
            vendor: "Cisco".to_string(),
            model: "Catalyst 9800".to_string(),
            firmware: "IOS-XE 17.3+".to_string(),
            category: TemplateCategory::Authentication,
            body: r#"radius server {{radius_server_name}}
 address ipv4 {{radius_server_ip}} auth-port 1812 acct-port 1813
 key {{radius_key}}
!
aaa group server radius {{server_group}}
 server name {{radius_server_name}}
!
aaa authentication dot1x {{server_group}} group {{server_group}}
!
wlan {{wlan_profile}} {{wlan_id}} {{ssid}}
 security dot1x authentication-list {{server_group}}
 security wpa akm dot1x
 no shutdown
!
end"#
                .to_string(),
            variables: vec![
                radius_server_name(),
                radius_server_ip(),
                radius_key(),
                VariableSchema::new(
                    "server_group",
                    VariableKind::Text {
                        pattern: Some("[A-Za-z0-9_-]+".to_string()),
                    },
                )
                .required()
                .with_default("NAC-GROUP"),
                VariableSchema::new("wlan_profile", VariableKind::text())
                    .required()
                    .with_label("WLAN profile name"),
                VariableSchema::new("wlan_id", VariableKind::Number)
                    .required()
                    .with_default(1)
                    .with_label("WLAN ID"),
                VariableSchema::new(
                    "ssid",
                    VariableKind::Text {
                        pattern: Some(".{1,32}".to_string()),
                    },
                )
                .required()
                .with_label("SSID"),
            ],
            tags: strings(&["802.1x", "wireless", "wpa-enterprise"]),
            use_cases: strings(&["802.1X wireless authentication", "EAP-TLS certificate authentication"]),
            requirements: strings(&["Access points joined to the controller", "RADIUS server reachable from the WLC"]),
            troubleshooting: vec![fix(
                "Clients fail at EAP exchange",
                "Check the server certificate chain trusted by the clients",
                &["show wireless client summary", "show aaa servers"],
            )],
            references: vec![reference("Catalyst 9800 configuration guide", CISCO_SUPPORT, ReferenceKind::Documentation)],
        },
        TemplateDefinition {
            id: "cisco-c9300-trustsec".to_string(),
            name: "Cisco Catalyst TrustSec Enforcement".to_string(),
            description: "Security group tag enforcement with policy download from the NAC server".to_string(),
            vendor: "Cisco".to_string(),
            model: "Catalyst 9300".to_string(),
            firmware: "IOS-XE 17.3+".to_string(),
            category: TemplateCategory::Segmentation,
            body: r#"radius server {{radius_server_name}}
 address ipv4 {{radius_server_ip}} auth-port 1812 acct-port 1813
 pac key {{radius_key}}
!
aaa authorization network {{authz_list}} group NAC
cts authorization list {{authz_list}}
cts role-based enforcement
cts role-based enforcement vlan-list {{enforcement_vlans}}
!
! run once in exec mode:
! cts credentials id {{device_id}} password {{cts_password}}
end"#
                .to_string(),
            variables: vec![
                radius_server_name(),
                radius_server_ip(),
                radius_key(),
                VariableSchema::new("authz_list", VariableKind::text())
                    .required()
                    .with_default("cts-list"),
                VariableSchema::new(
                    "enforcement_vlans",
                    VariableKind::Text {
                        pattern: Some("[0-9,-]+".to_string()),
                    },
                )
                .required()
                .with_label("Enforcement VLAN list"),
                VariableSchema::new("device_id", VariableKind::text())
                    .required()
                    .with_label("TrustSec device ID"),
                VariableSchema::new("cts_password", VariableKind::password())
                    .required()
                    .with_label("TrustSec device password"),
            ],
            tags: strings(&["trustsec", "sgt", "segmentation"]),
            use_cases: strings(&["Micro-segmentation", "Zero trust access"]),
            requirements: strings(&["Network device registered on the NAC server with TrustSec credentials"]),
            troubleshooting: vec![fix(
                "No SGACL policy downloaded",
                "Verify the PAC was provisioned and the device ID matches the server entry",
                &["show cts pacs", "show cts role-based permissions"],
            )],
            references: vec![],
        },
        TemplateDefinition {
            id: "aruba-cx-dot1x".to_string(),
            name: "Aruba CX 802.1X with MAC-Auth Fallback".to_string(),
            description: "Port-access 802.1X authenticator with MAC authentication fallback".to_string(),
            vendor: "Aruba".to_string(),
            model: "CX 6300".to_string(),
            firmware: "AOS-CX 10.10+".to_string(),
            category: TemplateCategory::Authentication,
            body: r#"radius-server host {{radius_server_ip}} key plaintext {{radius_key}} vrf {{vrf}}
aaa group server radius nac
    server {{radius_server_ip}} vrf {{vrf}}
aaa authentication port-access dot1x authenticator
    radius server-group nac
    enable
aaa authentication port-access mac-auth
    radius server-group nac
    enable
interface {{interface_range}}
    no shutdown
    vlan access {{access_vlan}}
    aaa authentication port-access client-limit {{client_limit}}
    aaa authentication port-access dot1x authenticator
        enable
    aaa authentication port-access mac-auth
        enable"#
                .to_string(),
            variables: vec![
                radius_server_ip(),
                radius_key(),
                VariableSchema::new("vrf", VariableKind::select(["default", "mgmt"]))
                    .required()
                    .with_default("default")
                    .with_label("VRF used to reach RADIUS"),
                interface_range("1/1/1-1/1/48"),
                access_vlan(),
                VariableSchema::new("client_limit", VariableKind::Number)
                    .with_default(4)
                    .with_label("Clients per port"),
            ],
            tags: strings(&["802.1x", "mac-auth", "wired"]),
            use_cases: strings(&["802.1X wired authentication", "MAB for IoT and printers"]),
            requirements: strings(&["RADIUS server reachable in the selected VRF"]),
            troubleshooting: vec![fix(
                "Ports stay in unauthorized state",
                "Check the RADIUS server group statistics for timeouts",
                &["show aaa authentication port-access interface all client-status", "show radius-server detail"],
            )],
            references: vec![reference("AOS-CX security guide", ARUBA_TECHDOCS, ReferenceKind::Documentation)],
        },
        TemplateDefinition {
            id: "juniper-ex-dot1x".to_string(),
            name: "Juniper EX 802.1X Authenticator".to_string(),
            description: "802.1X with MAC RADIUS fallback on an EX access interface".to_string(),
            vendor: "Juniper".to_string(),
            model: "EX4300".to_string(),
            firmware: "Junos 20.4+".to_string(),
            category: TemplateCategory::Authentication,
            body: r#"set access radius-server {{radius_server_ip}} secret "{{radius_key}}"
set access radius-server {{radius_server_ip}} source-address {{source_address}}
set access profile {{access_profile}} authentication-order radius
set access profile {{access_profile}} radius authentication-server {{radius_server_ip}}
set protocols dot1x authenticator authentication-profile-name {{access_profile}}
set protocols dot1x authenticator interface {{interface_name}} supplicant {{supplicant_mode}}
set protocols dot1x authenticator interface {{interface_name}} mac-radius"#
                .to_string(),
            variables: vec![
                radius_server_ip(),
                radius_key(),
                VariableSchema::new("source_address", VariableKind::ip())
                    .required()
                    .with_label("Switch source address"),
                VariableSchema::new(
                    "access_profile",
                    VariableKind::Text {
                        pattern: Some("[A-Za-z0-9_-]+".to_string()),
                    },
                )
                .required()
                .with_default("nac-profile"),
                VariableSchema::new("interface_name", VariableKind::text())
                    .required()
                    .with_label("Interface or interface-range name"),
                VariableSchema::new(
                    "supplicant_mode",
                    VariableKind::select(["single", "single-secure", "multiple"]),
                )
                .required()
                .with_default("multiple"),
            ],
            tags: strings(&["802.1x", "mac-radius", "wired"]),
            use_cases: strings(&["802.1X wired authentication", "MAB for IoT and printers"]),
            requirements: strings(&["Interfaces configured as family ethernet-switching access ports"]),
            troubleshooting: vec![fix(
                "Authenticator sessions stuck in connecting",
                "Confirm the supplicant responds to EAPOL and the RADIUS secret is correct",
                &["show dot1x interface detail", "show network-access aaa statistics authentication"],
            )],
            references: vec![reference("EX series 802.1X user guide", JUNIPER_DOCS, ReferenceKind::Documentation)],
        },
        TemplateDefinition {
            id: "fortinet-fortigate-radius-admin".to_string(),
            name: "FortiGate RADIUS Administrator Login".to_string(),
            description: "Remote administrator authentication against the NAC RADIUS service".to_string(),
            vendor: "Fortinet".to_string(),
            model: "FortiGate".to_string(),
            firmware: "FortiOS 7.0+".to_string(),
            category: TemplateCategory::Management,
            body: r#"config user radius
    edit "{{server_name}}"
        set server "{{radius_server_ip}}"
        set secret {{radius_key}}
        set auth-type {{auth_type}}
        set nas-ip {{nas_ip}}
    next
end
config user group
    edit "{{admin_group}}"
        set member "{{server_name}}"
    next
end
config system admin
    edit "{{admin_user}}"
        set remote-auth enable
        set accprofile "super_admin"
        set wildcard enable
        set remote-group "{{admin_group}}"
    next
end"#
                .to_string(),
            variables: vec![
                VariableSchema::new("server_name", VariableKind::text())
                    .required()
                    .with_default("NAC-RADIUS"),
                radius_server_ip(),
                radius_key(),
                VariableSchema::new("auth_type", VariableKind::select(["auto", "ms_chap_v2", "pap", "chap"]))
                    .required()
                    .with_default("auto"),
                VariableSchema::new("nas_ip", VariableKind::ip())
                    .required()
                    .with_label("FortiGate NAS IP"),
                VariableSchema::new("admin_group", VariableKind::text())
                    .required()
                    .with_default("radius-admins"),
                VariableSchema::new("admin_user", VariableKind::text())
                    .required()
                    .with_default("radius-wildcard"),
            ],
            tags: strings(&["radius", "admin", "device-administration"]),
            use_cases: strings(&["Device administration", "Firewall integration"]),
            requirements: strings(&["RADIUS policy returning the admin group attribute"]),
            troubleshooting: vec![fix(
                "Remote admins rejected",
                "Run the built-in RADIUS test and compare the auth-type with the server policy",
                &["diagnose test authserver radius NAC-RADIUS pap user pass"],
            )],
            references: vec![reference("FortiOS administration guide", FORTINET_DOCS, ReferenceKind::Documentation)],
        },
        TemplateDefinition {
            id: "extreme-exos-netlogin".to_string(),
            name: "Extreme EXOS NetLogin 802.1X + MAC".to_string(),
            description: "NetLogin with 802.1X and MAC authentication on edge ports".to_string(),
            vendor: "Extreme Networks".to_string(),
            model: "X450-G2".to_string(),
            firmware: "EXOS 30.x+".to_string(),
            category: TemplateCategory::Authentication,
            body: r#"configure radius netlogin primary server {{radius_server_ip}} 1812 client-ip {{client_ip}} vr {{virtual_router}}
configure radius netlogin primary shared-secret {{radius_key}}
enable radius netlogin
configure netlogin vlan {{netlogin_vlan}}
enable netlogin dot1x mac
enable netlogin ports {{ports}} dot1x mac
configure netlogin ports {{ports}} mode {{port_mode}}
configure netlogin dot1x timers reauth-period {{reauth_period}}"#
                .to_string(),
            variables: vec![
                radius_server_ip(),
                VariableSchema::new("client_ip", VariableKind::ip())
                    .required()
                    .with_label("Switch client IP"),
                VariableSchema::new("virtual_router", VariableKind::select(["VR-Default", "VR-Mgmt"]))
                    .required()
                    .with_default("VR-Mgmt"),
                radius_key(),
                VariableSchema::new("netlogin_vlan", VariableKind::text())
                    .required()
                    .with_default("nl-quarantine"),
                VariableSchema::new("ports", VariableKind::text())
                    .required()
                    .with_label("Port list"),
                VariableSchema::new(
                    "port_mode",
                    VariableKind::select(["port-based-vlans", "mac-based-vlans"]),
                )
                .required()
                .with_default("mac-based-vlans"),
                VariableSchema::new("reauth_period", VariableKind::Number).with_default(3600),
            ],
            tags: strings(&["netlogin", "802.1x", "mac", "wired"]),
            use_cases: strings(&["802.1X wired authentication", "MAB for IoT and printers"]),
            requirements: strings(&["NetLogin VLAN created before enabling NetLogin"]),
            troubleshooting: vec![fix(
                "Clients stay in the NetLogin VLAN",
                "Check that the RADIUS reply carries the destination VLAN attribute",
                &["show netlogin port", "show radius netlogin"],
            )],
            references: vec![reference("EXOS user guide", EXTREME_DOCS, ReferenceKind::Documentation)],
        },
    ]
}
